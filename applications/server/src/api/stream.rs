/// Audio streaming API
use crate::{
    error::{Result, ServerError},
    extract::PathParam,
    state::AppState,
};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap},
    response::Response,
};
use melody_core::{
    media::{self, MediaResource},
    range,
    storage::StorageContext,
    SongId,
};
use tokio_util::io::ReaderStream;

/// GET /api/songs/stream/:id
/// Stream a song's media file with single-range request support
pub async fn stream_song(
    PathParam(id): PathParam<SongId>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let song = app_state
        .db
        .get_song(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    let resource = MediaResource {
        id: song.id,
        total_length: app_state.blobs.size(&song.file_path).await?,
        mime_type: media::mime_type_for_path(&song.file_path),
        locator: song.file_path,
    };

    let range_header = headers
        .get(header::RANGE)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| ServerError::MalformedRange("header is not valid ASCII".to_string()))
        })
        .transpose()?;

    let plan = range::plan(resource.total_length, resource.mime_type, range_header)?;

    // Zero-length resources are served with an empty body
    let body = match plan.range {
        Some(window) => {
            let reader = app_state
                .blobs
                .open_range(&resource.locator, window.start, window.end)
                .await?;
            Body::from_stream(ReaderStream::with_capacity(
                reader,
                app_state.stream_chunk_size,
            ))
        }
        None => Body::empty(),
    };

    tracing::debug!(
        song_id = resource.id,
        status = plan.status(),
        bytes = plan.content_length(),
        "Streaming media"
    );

    let mut response = Response::builder().status(plan.status());
    for (name, value) in plan.headers() {
        response = response.header(name, value);
    }

    response
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}
