/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    extract::{JsonBody, PathParam, QueryParams},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use melody_core::{
    storage::StorageContext,
    types::{CreatePlaylist, Identity, Page, Playlist, PlaylistId, Song, SongId},
    validation,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongRequest {
    pub playlist_id: PlaylistId,
    pub song_id: SongId,
}

#[derive(Debug, Deserialize)]
pub struct SearchText {
    pub q: Option<String>,
}

/// Load a playlist the caller owns: 404 if absent, 403 if someone else's
async fn owned_playlist(
    app_state: &AppState,
    identity: &Identity,
    id: PlaylistId,
) -> Result<Playlist> {
    let playlist = app_state
        .db
        .get_playlist(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    playlist.ensure_owned_by(identity)?;
    Ok(playlist)
}

fn search_text(query: SearchText) -> Result<String> {
    let q = query.q.unwrap_or_default();
    validation::validate_search_query(&q)?;
    Ok(q.trim().to_string())
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Playlist name is required".to_string()))?;

    let playlist = app_state
        .db
        .create_playlist(CreatePlaylist {
            user_id: auth.user_id(),
            name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists
/// The caller's own playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.db.get_user_playlists(auth.user_id()).await?;
    Ok(Json(playlists))
}

/// GET /api/playlists/search?q=&limit=&offset=
pub async fn search_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    QueryParams(text): QueryParams<SearchText>,
    QueryParams(page): QueryParams<Page>,
) -> Result<Json<Vec<Playlist>>> {
    let q = search_text(text)?;
    let playlists = app_state
        .db
        .search_user_playlists(auth.user_id(), &q, page)
        .await?;
    Ok(Json(playlists))
}

/// GET /api/playlists/:id/songs
pub async fn get_playlist_songs(
    PathParam(id): PathParam<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Song>>> {
    owned_playlist(&app_state, auth.identity(), id).await?;

    let songs = app_state.db.get_playlist_songs(id).await?;
    Ok(Json(songs))
}

/// GET /api/playlists/:id/songs/search?q=&limit=&offset=
pub async fn search_playlist_songs(
    PathParam(id): PathParam<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    QueryParams(text): QueryParams<SearchText>,
    QueryParams(page): QueryParams<Page>,
) -> Result<Json<Vec<Song>>> {
    owned_playlist(&app_state, auth.identity(), id).await?;
    let q = search_text(text)?;

    let songs = app_state.db.search_playlist_songs(id, &q, page).await?;
    Ok(Json(songs))
}

/// POST /api/playlists/songs
pub async fn add_song_to_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<PlaylistSongRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    owned_playlist(&app_state, auth.identity(), req.playlist_id).await?;

    app_state
        .db
        .add_song_to_playlist(req.playlist_id, req.song_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Song added to playlist" })),
    ))
}

/// DELETE /api/playlists/songs
pub async fn remove_song_from_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<PlaylistSongRequest>,
) -> Result<Json<serde_json::Value>> {
    owned_playlist(&app_state, auth.identity(), req.playlist_id).await?;

    app_state
        .db
        .remove_song_from_playlist(req.playlist_id, req.song_id)
        .await?;

    Ok(Json(json!({ "message": "Song removed from playlist" })))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    PathParam(id): PathParam<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    owned_playlist(&app_state, auth.identity(), id).await?;

    app_state.db.delete_playlist(id).await?;
    Ok(Json(json!({ "message": "Playlist deleted successfully" })))
}
