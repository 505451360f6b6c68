/// Request middleware and auth extractors
pub mod auth;

pub use auth::{identity_middleware, AdminUser, AuthenticatedUser};
