/// User management API routes
use crate::{
    error::{Result, ServerError},
    extract::{JsonBody, PathParam, QueryParams},
    middleware::{AdminUser, AuthenticatedUser},
    state::AppState,
};
use axum::{extract::State, Json};
use melody_core::{storage::StorageContext, validation, UpdateUser, User, UserId};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub password: Option<String>,
}

/// GET /api/users
pub async fn list_users(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    let users = app_state.db.get_all_users().await?;
    Ok(Json(users))
}

/// GET /api/users/search?name=
pub async fn search_users(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    QueryParams(query): QueryParams<UserSearchQuery>,
) -> Result<Json<Vec<User>>> {
    let name = query.name.unwrap_or_default();
    validation::validate_search_query(&name)?;

    let users = app_state.db.search_users(name.trim()).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_user(
    PathParam(id): PathParam<UserId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<User>> {
    let user = app_state
        .db
        .get_user(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

/// PUT /api/users/:id
/// Partial update; callers may edit themselves, admins may edit anyone
pub async fn update_user(
    PathParam(id): PathParam<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>> {
    auth.identity().ensure_can_modify_user(id)?;

    let mut update = UpdateUser::default();

    if let Some(name) = req.name {
        validation::validate_display_name(&name)?;
        update.name = Some(name.trim().to_string());
    }
    if let Some(date_of_birth) = req.date_of_birth {
        update.date_of_birth = Some(validation::normalize_date_of_birth(&date_of_birth)?);
    }
    if let Some(password) = req.password {
        validation::validate_password(&password)?;
        update.password_hash = Some(app_state.auth_service.hash_password(&password)?);
    }

    if update.is_empty() {
        return Err(ServerError::BadRequest(
            "At least one of name, dateOfBirth or password is required".to_string(),
        ));
    }

    let user = app_state.db.update_user(id, update).await?;
    Ok(Json(json!({
        "message": "User updated successfully",
        "user": user,
    })))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    PathParam(id): PathParam<UserId>,
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<serde_json::Value>> {
    app_state.db.delete_user(id).await?;
    tracing::info!(user_id = id, admin_id = admin.id, "User deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
