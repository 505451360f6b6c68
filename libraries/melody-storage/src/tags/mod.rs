//! Genre and artist tables and song links
//!
//! Both tag kinds share one shape (`id`, unique `name`) and one link shape
//! (`song_id`, `<kind>_id`), so every query here is parameterized by
//! [`TagKind`]. Table and column names come from `TagKind` itself and are
//! never taken from input.

use melody_core::{
    error::{MelodyError, Result},
    tags::validate_name,
    types::{SongId, Tag, TagId, TagKind},
};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Insert attempts before get-or-create gives up
pub const MAX_GET_OR_CREATE_ATTEMPTS: usize = 3;

/// Get all tags of one kind
pub async fn get_all(pool: &SqlitePool, kind: TagKind) -> Result<Vec<Tag>> {
    let rows = sqlx::query(&format!(
        "SELECT id, name FROM {} ORDER BY name",
        kind.table()
    ))
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(Tag {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        })
        .collect()
}

/// Find a tag by exact (case-sensitive) name
pub async fn find_by_name(pool: &SqlitePool, kind: TagKind, name: &str) -> Result<Option<Tag>> {
    let row = sqlx::query(&format!(
        "SELECT id, name FROM {} WHERE name = ?",
        kind.table()
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(Tag {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    })
    .transpose()
}

/// Return the id for `name`, inserting the tag if it does not exist yet.
///
/// The insert goes first so a concurrent writer holding the same name is
/// resolved by the UNIQUE constraint; the loser reads the winner's row back.
pub async fn get_or_create(conn: &mut SqliteConnection, kind: TagKind, name: &str) -> Result<TagId> {
    let insert = format!(
        "INSERT INTO {} (name) VALUES (?) ON CONFLICT(name) DO NOTHING RETURNING id",
        kind.table()
    );
    let lookup = format!("SELECT id FROM {} WHERE name = ?", kind.table());

    for attempt in 1..=MAX_GET_OR_CREATE_ATTEMPTS {
        match sqlx::query_scalar::<_, TagId>(&insert)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
        {
            Ok(Some(id)) => return Ok(id),
            Ok(None) => {}
            Err(err) if crate::is_unique_violation(&err) => {}
            Err(err) => return Err(err.into()),
        }

        let existing = sqlx::query_scalar::<_, TagId>(&lookup)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        tracing::debug!(kind = kind.label(), name, attempt, "Tag lookup missed after conflict, retrying");
    }

    Err(MelodyError::storage(format!(
        "Failed to get or create {} {name:?} after {MAX_GET_OR_CREATE_ATTEMPTS} attempts",
        kind.label()
    )))
}

/// Replace every link of `kind` for a song with links to `names`.
///
/// Runs on the caller's transaction. Each name is validated before its row
/// is touched, so an invalid name fails the whole write.
pub async fn replace_links(
    conn: &mut SqliteConnection,
    song_id: SongId,
    kind: TagKind,
    names: &[String],
) -> Result<()> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE song_id = ?",
        kind.link_table()
    ))
    .bind(song_id)
    .execute(&mut *conn)
    .await?;

    let link = format!(
        "INSERT OR IGNORE INTO {} (song_id, {}) VALUES (?, ?)",
        kind.link_table(),
        kind.link_column()
    );

    for name in names {
        validate_name(name)?;
        let tag_id = get_or_create(&mut *conn, kind, name).await?;

        sqlx::query(&link)
            .bind(song_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Count link rows of `kind` for a song
pub async fn count_links(pool: &SqlitePool, song_id: SongId, kind: TagKind) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {} WHERE song_id = ?",
        kind.link_table()
    ))
    .bind(song_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
