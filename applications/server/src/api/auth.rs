/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    extract::JsonBody,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use melody_core::{storage::StorageContext, validation, CreateUser, Role, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let (Some(email), Some(password), Some(name), Some(date_of_birth)) =
        (req.email, req.password, req.name, req.date_of_birth)
    else {
        return Err(ServerError::BadRequest(
            "email, password, name and dateOfBirth are required".to_string(),
        ));
    };

    let email = email.trim().to_string();
    validation::validate_email(&email)?;
    validation::validate_password(&password)?;
    validation::validate_display_name(&name)?;
    let date_of_birth = validation::normalize_date_of_birth(&date_of_birth)?;

    if app_state.db.get_user_by_email(&email).await?.is_some() {
        return Err(ServerError::Conflict("User already exists".to_string()));
    }

    let password_hash = app_state.auth_service.hash_password(&password)?;
    let user = app_state
        .db
        .create_user(CreateUser {
            email,
            password_hash,
            name: name.trim().to_string(),
            date_of_birth,
            role: Role::User,
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(ServerError::BadRequest(
            "email and password are required".to_string(),
        ));
    };

    let invalid = || ServerError::Auth("Invalid email or password".to_string());

    let credentials = app_state
        .db
        .get_credentials_by_email(email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !app_state
        .auth_service
        .verify_password(&password, &credentials.password_hash)?
    {
        return Err(invalid());
    }

    let token = app_state
        .auth_service
        .create_token(&credentials.user.identity())?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: credentials.user,
    }))
}
