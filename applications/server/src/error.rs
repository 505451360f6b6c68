/// Server error types
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use melody_core::{range::RangeError, MelodyError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Malformed Range header: {0}")]
    MalformedRange(String),

    #[error("Range not satisfiable for resource of {total_length} bytes")]
    RangeNotSatisfiable { total_length: u64 },

    #[error("Media resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<MelodyError> for ServerError {
    fn from(err: MelodyError) -> Self {
        match err {
            MelodyError::NotFound { .. } => ServerError::NotFound(err.to_string()),
            MelodyError::InvalidName { .. } | MelodyError::InvalidInput(_) => {
                ServerError::BadRequest(err.to_string())
            }
            MelodyError::DuplicateTitle(_) | MelodyError::Duplicate(_) => {
                ServerError::Conflict(err.to_string())
            }
            MelodyError::PermissionDenied(msg) => ServerError::Unauthorized(msg),
            MelodyError::Storage(msg) => ServerError::Storage(msg),
            MelodyError::Database(msg) => ServerError::Database(msg),
        }
    }
}

impl From<RangeError> for ServerError {
    fn from(err: RangeError) -> Self {
        match err {
            RangeError::Malformed(reason) => ServerError::MalformedRange(reason.to_string()),
            RangeError::NotSatisfiable { total_length } => {
                ServerError::RangeNotSatisfiable { total_length }
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::MalformedRange(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Malformed Range header: {msg}"),
            ),
            ServerError::RangeNotSatisfiable { total_length } => {
                // 416 carries no body, only the resource length
                return (
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    [(header::CONTENT_RANGE, format!("bytes */{total_length}"))],
                )
                    .into_response();
            }
            ServerError::ResourceUnavailable(ref locator) => {
                tracing::warn!(locator, "Media file missing from storage");
                (StatusCode::NOT_FOUND, "Media file not found".to_string())
            }
            ServerError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ServerError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_http_kinds() {
        let cases = [
            (MelodyError::not_found("Song", 1), StatusCode::NOT_FOUND),
            (
                MelodyError::invalid_name("Rock!", "contains invalid characters"),
                StatusCode::BAD_REQUEST,
            ),
            (
                MelodyError::DuplicateTitle("Same".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                MelodyError::permission_denied("nope"),
                StatusCode::FORBIDDEN,
            ),
            (
                MelodyError::Database("disk I/O error".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ServerError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn not_satisfiable_has_content_range_and_no_json() {
        let response =
            ServerError::from(RangeError::NotSatisfiable { total_length: 10 }).into_response();

        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */10"
        );
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
