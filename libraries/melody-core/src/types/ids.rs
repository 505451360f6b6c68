//! Identifiers and request identity

use crate::error::{MelodyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;
pub type SongId = i64;
pub type PlaylistId = i64;
pub type TagId = i64;
pub type GenreId = TagId;
pub type ArtistId = TagId;

/// Account role carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(MelodyError::invalid_input(format!("Invalid role: {other}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The already-authenticated caller of an operation.
///
/// Handlers receive this from a verified bearer token and pass it
/// explicitly to every check that needs authorization context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails unless the caller holds the admin role
    pub fn ensure_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(MelodyError::permission_denied("Admin access required"))
        }
    }

    /// Users may modify their own account; admins may modify any account
    pub fn ensure_can_modify_user(&self, user_id: UserId) -> Result<()> {
        if self.id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(MelodyError::permission_denied(
                "You can only update your own account or must be an admin",
            ))
        }
    }
}

/// Limit/offset window for search endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

pub const MAX_PAGE_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    10
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Limit clamped to `1..=MAX_PAGE_LIMIT`
    pub fn effective_limit(&self) -> i64 {
        i64::from(self.limit.clamp(1, MAX_PAGE_LIMIT))
    }

    pub fn effective_offset(&self) -> i64 {
        i64::from(self.offset)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(default_limit(), 0)
    }
}
