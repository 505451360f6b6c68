//! Genre and artist tags

use crate::types::TagId;
use serde::{Deserialize, Serialize};

/// Which tag table a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Genre,
    Artist,
}

impl TagKind {
    pub fn label(&self) -> &'static str {
        match self {
            TagKind::Genre => "Genre",
            TagKind::Artist => "Artist",
        }
    }

    /// Table holding the unique tag names
    pub fn table(&self) -> &'static str {
        match self {
            TagKind::Genre => "genres",
            TagKind::Artist => "artists",
        }
    }

    /// Association table linking songs to tags of this kind
    pub fn link_table(&self) -> &'static str {
        match self {
            TagKind::Genre => "song_genres",
            TagKind::Artist => "song_artists",
        }
    }

    /// Foreign-key column of the association table
    pub fn link_column(&self) -> &'static str {
        match self {
            TagKind::Genre => "genre_id",
            TagKind::Artist => "artist_id",
        }
    }
}

/// A genre or artist row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}
