use crate::songs::{row_to_song, SONG_SELECT};
use melody_core::{error::MelodyError, error::Result, types::*};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn row_to_playlist(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Get playlists owned by a user, newest first
pub async fn get_user_playlists(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, name, created_at
        FROM playlists
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_playlist).collect()
}

/// Search a user's playlists by name
pub async fn search_user_playlists(
    pool: &SqlitePool,
    user_id: UserId,
    query: &str,
    page: Page,
) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, name, created_at
        FROM playlists
        WHERE user_id = ? AND name LIKE ?
        ORDER BY name
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(format!("%{query}%"))
    .bind(page.effective_limit())
    .bind(page.effective_offset())
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_playlist).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, user_id, name, created_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_playlist).transpose()
}

pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let result = sqlx::query("INSERT INTO playlists (user_id, name) VALUES (?, ?)")
        .bind(playlist.user_id)
        .bind(&playlist.name)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MelodyError::storage("Failed to retrieve created playlist"))
}

/// Songs of a playlist in insertion order
pub async fn get_songs(pool: &SqlitePool, id: PlaylistId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "{SONG_SELECT}
         JOIN playlist_songs ps ON ps.song_id = s.id
         WHERE ps.playlist_id = ?
         ORDER BY ps.added_at, s.id"
    ))
    .bind(id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_song).collect()
}

/// Search songs within a playlist by title or artist
pub async fn search_songs(
    pool: &SqlitePool,
    id: PlaylistId,
    query: &str,
    page: Page,
) -> Result<Vec<Song>> {
    let pattern = format!("%{query}%");
    let rows = sqlx::query(&format!(
        "{SONG_SELECT}
         JOIN playlist_songs ps ON ps.song_id = s.id
         WHERE ps.playlist_id = ?
           AND (s.title LIKE ?
                OR EXISTS (SELECT 1
                             FROM song_artists sa JOIN artists a ON a.id = sa.artist_id
                            WHERE sa.song_id = s.id AND a.name LIKE ?))
         ORDER BY ps.added_at, s.id
         LIMIT ? OFFSET ?"
    ))
    .bind(id)
    .bind(&pattern)
    .bind(&pattern)
    .bind(page.effective_limit())
    .bind(page.effective_offset())
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_song).collect()
}

/// Add a song to a playlist
///
/// # Errors
///
/// `NotFound` if the song does not exist, `Duplicate` if it is already present
pub async fn add_song(pool: &SqlitePool, playlist_id: PlaylistId, song_id: SongId) -> Result<()> {
    let song = sqlx::query_scalar::<_, SongId>("SELECT id FROM songs WHERE id = ?")
        .bind(song_id)
        .fetch_optional(pool)
        .await?;
    if song.is_none() {
        return Err(MelodyError::not_found("Song", song_id));
    }

    sqlx::query("INSERT INTO playlist_songs (playlist_id, song_id) VALUES (?, ?)")
        .bind(playlist_id)
        .bind(song_id)
        .execute(pool)
        .await
        .map_err(|err| {
            if crate::is_unique_violation(&err) {
                MelodyError::Duplicate("Song already in playlist".to_string())
            } else {
                err.into()
            }
        })?;

    Ok(())
}

pub async fn remove_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MelodyError::not_found("Playlist song", song_id));
    }

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MelodyError::not_found("Playlist", id));
    }

    Ok(())
}
