//! Song types

use crate::types::SongId;
use serde::{Deserialize, Serialize};

/// An uploaded song with its current genre and artist sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    /// Blob locator of the media file
    pub file_path: String,
    pub uploaded_at: String,
    pub genres: Vec<String>,
    pub artists: Vec<String>,
}

/// Data for creating a new song. Tag lists are expected to be normalized.
#[derive(Debug, Clone)]
pub struct CreateSong {
    pub title: String,
    pub file_path: String,
    pub genres: Vec<String>,
    pub artists: Vec<String>,
}

/// Partial song update. A `Some` tag list replaces the whole set for that kind.
#[derive(Debug, Clone, Default)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub genres: Option<Vec<String>>,
    pub artists: Option<Vec<String>>,
}

impl UpdateSong {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.genres.is_none() && self.artists.is_none()
    }
}
