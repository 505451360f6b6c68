//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so the pool's several connections all see the same schema and data.

#![allow(dead_code)]

use melody_core::types::*;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = melody_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        melody_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of rows in a table
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

/// Test fixture: Create a test user with role `user`
pub async fn create_test_user(pool: &SqlitePool, email: &str, name: &str) -> User {
    melody_storage::users::create(
        pool,
        CreateUser {
            email: email.to_string(),
            password_hash: "$2b$04$not-a-real-hash".to_string(),
            name: name.to_string(),
            date_of_birth: "1990-01-01".to_string(),
            role: Role::User,
        },
    )
    .await
    .expect("Failed to create test user")
}

/// Test fixture: Create a test song with tags
pub async fn create_test_song(
    pool: &SqlitePool,
    title: &str,
    genres: &[&str],
    artists: &[&str],
) -> Song {
    melody_storage::songs::create(
        pool,
        CreateSong {
            title: title.to_string(),
            file_path: format!("{}.mp3", title.to_lowercase().replace(' ', "-")),
            genres: genres.iter().map(|s| (*s).to_string()).collect(),
            artists: artists.iter().map(|s| (*s).to_string()).collect(),
        },
    )
    .await
    .expect("Failed to create test song")
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
