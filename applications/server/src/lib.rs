//! Melody Server Library
//!
//! Music streaming REST backend: accounts, song upload with genre/artist
//! tagging, byte-range streaming and playlists.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{auth::AuthService, file_storage::BlobSource, file_storage::FileStorage};
pub use state::AppState;
