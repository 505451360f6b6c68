/// Songs API routes
use crate::{
    error::{Result, ServerError},
    extract::{JsonBody, PathParam, QueryParams},
    middleware::AdminUser,
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use melody_core::{
    media,
    storage::StorageContext,
    tags::{self, TagInput},
    validation, CreateSong, Song, SongId, UpdateSong,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct SongSearchQuery {
    pub q: Option<String>,
}

/// JSON body for `PUT /api/songs/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub title: Option<String>,
    pub genres: Option<TagInput>,
    pub artists: Option<TagInput>,
}

/// Fields collected from a multipart song upload
#[derive(Debug, Default)]
struct SongUpload {
    title: Option<String>,
    genres: Option<String>,
    artists: Option<String>,
    file: Option<UploadedFile>,
}

#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    data: Bytes,
}

/// GET /api/songs
pub async fn list_songs(State(app_state): State<AppState>) -> Result<Json<Vec<Song>>> {
    let songs = app_state.db.get_all_songs().await?;
    Ok(Json(songs))
}

/// GET /api/songs/:id
pub async fn get_song(
    PathParam(id): PathParam<SongId>,
    State(app_state): State<AppState>,
) -> Result<Json<Song>> {
    let song = app_state
        .db
        .get_song(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;
    Ok(Json(song))
}

/// GET /api/songs/search?q=
/// Matches title or artist name
pub async fn search_songs(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<SongSearchQuery>,
) -> Result<Json<Vec<Song>>> {
    let q = query.q.unwrap_or_default();
    validation::validate_search_query(&q)?;

    let songs = app_state.db.search_songs(q.trim()).await?;
    Ok(Json(songs))
}

/// GET /api/songs/search-by-genres?genres=Rock,Jazz
///
/// Accepts a comma-separated list, repeated `genres` parameters, or both.
pub async fn search_songs_by_genres(
    State(app_state): State<AppState>,
    QueryParams(params): QueryParams<Vec<(String, String)>>,
) -> Result<Json<Vec<Song>>> {
    let genres: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "genres" || key == "genres[]")
        .flat_map(|(_, value)| tags::split_name_list(&value))
        .collect();

    if genres.is_empty() {
        return Err(ServerError::BadRequest(
            "genres query parameter is required".to_string(),
        ));
    }
    tags::validate_names(&genres)?;

    let songs = app_state
        .db
        .search_songs_by_genres(&tags::dedupe(genres))
        .await?;
    Ok(Json(songs))
}

/// POST /api/songs
/// Multipart upload: `file` plus `title`, `genres` and `artists` text fields
pub async fn create_song(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Song>)> {
    let upload = parse_upload(&headers, body).await?;

    let title = upload
        .title
        .map(|t| t.trim().to_string())
        .ok_or_else(|| ServerError::BadRequest("title is required".to_string()))?;
    validation::validate_song_title(&title)?;

    let genres = tags::normalize(upload.genres.map(TagInput::Text))?;
    let artists = tags::normalize(upload.artists.map(TagInput::Text))?;

    let file = upload
        .file
        .ok_or_else(|| ServerError::BadRequest("Audio file is required".to_string()))?;
    let extension = media::supported_extension(&file.file_name).ok_or_else(|| {
        ServerError::BadRequest("Only .mp3, .wav and .m4a files are allowed".to_string())
    })?;

    let locator = app_state.blobs.store(&extension, &file.data).await?;

    let created = app_state
        .db
        .create_song(CreateSong {
            title,
            file_path: locator.clone(),
            genres,
            artists,
        })
        .await;

    match created {
        Ok(song) => {
            tracing::info!(song_id = song.id, admin_id = admin.id, "Song uploaded");
            Ok((StatusCode::CREATED, Json(song)))
        }
        Err(err) => {
            discard_blob(&app_state, &locator).await;
            Err(err.into())
        }
    }
}

/// PUT /api/songs/:id
/// Partial update; a supplied tag list replaces the whole set
pub async fn update_song(
    PathParam(id): PathParam<SongId>,
    State(app_state): State<AppState>,
    _admin: AdminUser,
    JsonBody(req): JsonBody<UpdateSongRequest>,
) -> Result<Json<Song>> {
    let title = req.title.map(|t| t.trim().to_string());
    if let Some(title) = &title {
        validation::validate_song_title(title)?;
    }

    let update = UpdateSong {
        title,
        genres: tags::normalize_field(req.genres)?,
        artists: tags::normalize_field(req.artists)?,
    };

    if update.is_empty() {
        return Err(ServerError::BadRequest(
            "At least one of title, genres or artists is required".to_string(),
        ));
    }

    let song = app_state.db.update_song(id, update).await?;
    Ok(Json(song))
}

/// DELETE /api/songs/:id
/// Removes the row first, then the media file
pub async fn delete_song(
    PathParam(id): PathParam<SongId>,
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<serde_json::Value>> {
    let song = app_state.db.delete_song(id).await?;
    discard_blob(&app_state, &song.file_path).await;

    Ok(Json(json!({ "message": "Song deleted successfully" })))
}

/// Best-effort blob removal; failures are logged, never surfaced
async fn discard_blob(app_state: &AppState, locator: &str) {
    if let Err(e) = app_state.blobs.delete(locator).await {
        tracing::warn!(locator, "Failed to remove media file: {}", e);
    }
}

async fn parse_upload(headers: &HeaderMap, body: Bytes) -> Result<SongUpload> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Missing boundary".to_string()))?;

    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut upload = SongUpload::default();
    let bad_field = |e: multer::Error| ServerError::BadRequest(format!("Failed to parse multipart: {e}"));

    while let Some(field) = multipart.next_field().await.map_err(bad_field)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(bad_field)?;
                upload.file = Some(UploadedFile { file_name, data });
            }
            "title" => upload.title = Some(field.text().await.map_err(bad_field)?),
            "genres" => upload.genres = Some(field.text().await.map_err(bad_field)?),
            "artists" => upload.artists = Some(field.text().await.map_err(bad_field)?),
            _ => {}
        }
    }

    Ok(upload)
}
