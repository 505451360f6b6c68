//! User accounts and credential lookup

use melody_core::{
    error::{MelodyError, Result},
    types::{CreateUser, Role, UpdateUser, User, UserCredentials, UserId},
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const USER_COLUMNS: &str = "id, email, name, date_of_birth, role, created_at";

fn row_to_user(row: &SqliteRow) -> Result<User> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        date_of_birth: row.try_get("date_of_birth")?,
        role: role.parse::<Role>()?,
        created_at: row.try_get("created_at")?,
    })
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_user).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Get a user together with the stored password hash, for login
pub async fn get_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(UserCredentials {
            user: row_to_user(&row)?,
            password_hash: row.try_get("password_hash")?,
        })
    })
    .transpose()
}

/// Case-insensitive substring match on display name
pub async fn search_by_name(pool: &SqlitePool, name: &str) -> Result<Vec<User>> {
    let pattern = format!("%{name}%");
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE name LIKE ? ORDER BY name"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_user).collect()
}

/// Create a new user
///
/// # Errors
///
/// Returns `Duplicate` if the email is already registered
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, name, date_of_birth, role)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&user.date_of_birth)
    .bind(user.role.as_str())
    .execute(pool)
    .await
    .map_err(|err| {
        if crate::is_unique_violation(&err) {
            MelodyError::Duplicate(format!("Email already registered: {}", user.email))
        } else {
            err.into()
        }
    })?;

    let id = result.last_insert_rowid();
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MelodyError::storage("Failed to retrieve created user"))
}

/// Apply a partial update; `None` fields keep their stored value
pub async fn update(pool: &SqlitePool, id: UserId, update: UpdateUser) -> Result<User> {
    let result = sqlx::query(
        "UPDATE users
         SET name = COALESCE(?, name),
             date_of_birth = COALESCE(?, date_of_birth),
             password_hash = COALESCE(?, password_hash)
         WHERE id = ?",
    )
    .bind(update.name)
    .bind(update.date_of_birth)
    .bind(update.password_hash)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(MelodyError::not_found("User", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MelodyError::not_found("User", id))
}

pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MelodyError::not_found("User", id));
    }

    Ok(())
}
