//! Songs and their transactional tag writes

use crate::tags;
use melody_core::{
    error::{MelodyError, Result},
    types::{CreateSong, Song, SongId, TagKind, UpdateSong},
};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqliteConnection, SqlitePool, Transaction};

/// Song columns plus its genre and artist names as JSON arrays.
///
/// JSON keeps names containing commas intact, which `GROUP_CONCAT` would not.
pub(crate) const SONG_SELECT: &str = "
    SELECT s.id, s.title, s.file_path, s.uploaded_at,
           (SELECT json_group_array(g.name)
              FROM song_genres sg JOIN genres g ON g.id = sg.genre_id
             WHERE sg.song_id = s.id) AS genres,
           (SELECT json_group_array(a.name)
              FROM song_artists sa JOIN artists a ON a.id = sa.artist_id
             WHERE sa.song_id = s.id) AS artists
      FROM songs s";

pub(crate) fn row_to_song(row: &SqliteRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        file_path: row.try_get("file_path")?,
        uploaded_at: row.try_get("uploaded_at")?,
        genres: parse_names(row.try_get("genres")?)?,
        artists: parse_names(row.try_get("artists")?)?,
    })
}

fn parse_names(json: Option<String>) -> Result<Vec<String>> {
    let Some(json) = json else {
        return Ok(Vec::new());
    };
    let mut names: Vec<String> = serde_json::from_str(&json)
        .map_err(|e| MelodyError::storage(format!("Invalid tag list in row: {e}")))?;
    names.sort();
    Ok(names)
}

/// Get all songs
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!("{SONG_SELECT} ORDER BY s.id"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_song).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: SongId) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("{SONG_SELECT} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_song).transpose()
}

/// Substring match on title or on any linked artist name
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Song>> {
    let pattern = format!("%{query}%");
    let rows = sqlx::query(&format!(
        "{SONG_SELECT}
         WHERE s.title LIKE ?
            OR EXISTS (SELECT 1
                         FROM song_artists sa JOIN artists a ON a.id = sa.artist_id
                        WHERE sa.song_id = s.id AND a.name LIKE ?)
         ORDER BY s.title"
    ))
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_song).collect()
}

/// Songs linked to any of the given genre names (exact match)
pub async fn search_by_genres(pool: &SqlitePool, genres: &[String]) -> Result<Vec<Song>> {
    if genres.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; genres.len()].join(", ");
    let sql = format!(
        "{SONG_SELECT}
         WHERE EXISTS (SELECT 1
                         FROM song_genres sg JOIN genres g ON g.id = sg.genre_id
                        WHERE sg.song_id = s.id AND g.name IN ({placeholders}))
         ORDER BY s.title"
    );

    let mut query = sqlx::query(&sql);
    for genre in genres {
        query = query.bind(genre);
    }
    let rows = query.fetch_all(pool).await?;

    rows.iter().map(row_to_song).collect()
}

/// Open a song write transaction holding the write lock from its first statement.
///
/// A deferred transaction that reads before writing cannot wait for the lock
/// when it upgrades and fails with SQLITE_BUSY; `BEGIN IMMEDIATE` waits under
/// the pool's busy timeout instead.
async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Fail with `DuplicateTitle` if another song already uses `title`
async fn ensure_title_available(
    conn: &mut SqliteConnection,
    title: &str,
    except: Option<SongId>,
) -> Result<()> {
    let taken = sqlx::query_scalar::<_, SongId>("SELECT id FROM songs WHERE title = ? AND id IS NOT ?")
        .bind(title)
        .bind(except)
        .fetch_optional(&mut *conn)
        .await?;

    match taken {
        Some(_) => Err(MelodyError::DuplicateTitle(title.to_string())),
        None => Ok(()),
    }
}

fn map_title_conflict(err: sqlx::Error, title: &str) -> MelodyError {
    if crate::is_unique_violation(&err) {
        MelodyError::DuplicateTitle(title.to_string())
    } else {
        err.into()
    }
}

/// Create a song and link its genres and artists.
///
/// The title check, the song insert, every tag get-or-create and both link
/// rewrites share one transaction; any failure leaves no rows behind.
pub async fn create(pool: &SqlitePool, song: CreateSong) -> Result<Song> {
    let mut tx = begin_write(pool).await?;

    ensure_title_available(&mut tx, &song.title, None).await?;

    let id = sqlx::query("INSERT INTO songs (title, file_path) VALUES (?, ?)")
        .bind(&song.title)
        .bind(&song.file_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_title_conflict(e, &song.title))?
        .last_insert_rowid();

    tags::replace_links(&mut tx, id, TagKind::Genre, &song.genres).await?;
    tags::replace_links(&mut tx, id, TagKind::Artist, &song.artists).await?;

    tx.commit().await?;

    tracing::debug!(song_id = id, title = %song.title, "Song created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MelodyError::storage("Failed to retrieve created song"))
}

/// Update a song's title and/or replace its tag sets.
///
/// A `None` tag list leaves that kind untouched; `Some(vec![])` clears it.
pub async fn update(pool: &SqlitePool, id: SongId, update: UpdateSong) -> Result<Song> {
    let mut tx = begin_write(pool).await?;

    let exists = sqlx::query_scalar::<_, SongId>("SELECT id FROM songs WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(MelodyError::not_found("Song", id));
    }

    if let Some(title) = &update.title {
        ensure_title_available(&mut tx, title, Some(id)).await?;

        sqlx::query("UPDATE songs SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_title_conflict(e, title))?;
    }

    if let Some(genres) = &update.genres {
        tags::replace_links(&mut tx, id, TagKind::Genre, genres).await?;
    }
    if let Some(artists) = &update.artists {
        tags::replace_links(&mut tx, id, TagKind::Artist, artists).await?;
    }

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MelodyError::not_found("Song", id))
}

/// Delete a song, returning the removed row. Links and playlist entries cascade.
pub async fn delete(pool: &SqlitePool, id: SongId) -> Result<Song> {
    let song = get_by_id(pool, id)
        .await?
        .ok_or_else(|| MelodyError::not_found("Song", id))?;

    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MelodyError::not_found("Song", id));
    }

    Ok(song)
}
