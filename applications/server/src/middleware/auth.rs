/// Authentication middleware
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use melody_core::{Identity, UserId};
use std::sync::Arc;

/// Verified caller, stored in request extensions by [`identity_middleware`].
/// Used as an extractor, it rejects unauthenticated requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.0.id
    }

    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Extractor for admin-only handlers: 401 without a token, 403 for non-admins
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub Identity);

/// Resolve the bearer token, if any, into an [`AuthenticatedUser`].
///
/// Requests without an `Authorization` header pass through untouched so
/// public routes keep working; a header that is present but invalid is
/// rejected outright.
pub async fn identity_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if let Some(value) = request.headers().get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| ServerError::Auth("Malformed Authorization header".to_string()))?;

        let identity = auth_service.verify_identity(token).map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            ServerError::Auth("Invalid or expired token".to_string())
        })?;

        request.extensions_mut().insert(AuthenticatedUser(identity));
    }

    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ServerError::Auth("Authentication required".to_string()))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(identity) = AuthenticatedUser::from_request_parts(parts, state).await?;
        identity.ensure_admin()?;
        Ok(AdminUser(identity))
    }
}
