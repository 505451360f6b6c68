/// User domain type
use crate::types::{Role, UserId};
use serde::{Deserialize, Serialize};

/// User account as exposed by the API (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login email, unique across users
    pub email: String,

    /// Display name
    pub name: String,

    /// Date of birth (`YYYY-MM-DD`)
    pub date_of_birth: String,

    pub role: Role,

    /// Account creation timestamp
    pub created_at: String,
}

impl User {
    pub fn identity(&self) -> crate::types::Identity {
        crate::types::Identity::new(self.id, self.role)
    }
}

/// A user together with the stored bcrypt hash, used only for login
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub date_of_birth: String,
    pub role: Role,
}

/// Partial user update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date_of_birth.is_none() && self.password_hash.is_none()
    }
}
