//! Playlist types

use crate::error::{MelodyError, Result};
use crate::types::{Identity, PlaylistId, UserId};
use serde::{Deserialize, Serialize};

/// A user-owned playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: String,
}

impl Playlist {
    /// Playlists are private to their owner
    pub fn ensure_owned_by(&self, identity: &Identity) -> Result<()> {
        if self.user_id == identity.id {
            Ok(())
        } else {
            Err(MelodyError::permission_denied(
                "Playlist does not belong to user",
            ))
        }
    }
}

/// Data for creating a new playlist
#[derive(Debug, Clone)]
pub struct CreatePlaylist {
    pub user_id: UserId,
    pub name: String,
}
