//! Melody Core
//!
//! Platform-agnostic domain types, traits, and error handling for the Melody
//! streaming backend.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Playlist`, `User`, `Identity`, etc.
//! - **Range planning**: pure HTTP `Range` resolution for media delivery ([`range`])
//! - **Tag normalization**: decoding and validation of genre/artist lists ([`tags`])
//! - **Storage seam**: the [`StorageContext`] trait implemented by `melody-storage`
//! - **Error Handling**: unified `MelodyError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use melody_core::range::plan;
//! use melody_core::tags::{normalize, TagInput};
//!
//! let plan = plan(1000, "audio/mpeg", Some("bytes=100-")).unwrap();
//! assert_eq!(plan.status(), 206);
//! assert_eq!(plan.content_length(), 900);
//!
//! let genres = normalize(Some(TagInput::Text(r#"["Rock","Pop","Rock"]"#.into()))).unwrap();
//! assert_eq!(genres, vec!["Rock", "Pop"]);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod media;
pub mod range;
pub mod storage;
pub mod tags;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{MelodyError, Result};
pub use storage::StorageContext;

pub use types::{
    ArtistId, CreatePlaylist, CreateSong, CreateUser, GenreId, Identity, Page, Playlist,
    PlaylistId, Role, Song, SongId, Tag, TagId, TagKind, UpdateSong, UpdateUser, User,
    UserCredentials, UserId,
};
