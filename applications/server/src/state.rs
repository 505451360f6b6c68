/// Shared application state
use crate::services::{AuthService, BlobSource};
use melody_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub blobs: Arc<dyn BlobSource>,
    /// Read window for media bodies
    pub stream_chunk_size: usize,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        auth_service: Arc<AuthService>,
        blobs: Arc<dyn BlobSource>,
        stream_chunk_size: usize,
    ) -> Self {
        Self {
            db,
            auth_service,
            blobs,
            stream_chunk_size,
        }
    }
}
