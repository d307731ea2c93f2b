//! Registration, login, and logout handlers.
//!
//! Passwords are hashed with Argon2id; sessions use opaque bearer tokens
//! whose SHA-256 hashes live in the `auth_tokens` table.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_core::identity::UserRepository;
use parley_infra::crypto::password::{hash_password, verify_password};
use parley_types::error::AuthError;
use parley_types::identity::{User, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::auth::{issue_token, revoke_token};
use crate::http::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Confirmation; must match `password`.
    pub password2: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Plaintext session token, shown once.
    pub token: String,
    pub username: String,
    pub email: String,
}

/// Request body for logout.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

fn validate_registration(body: &RegisterRequest) -> Result<(), AuthError> {
    if body.username.trim().len() < 3 {
        return Err(AuthError::InvalidInput(
            "username must be at least 3 characters".to_string(),
        ));
    }
    if !body.email.contains('@') {
        return Err(AuthError::InvalidInput(
            "email address is not valid".to_string(),
        ));
    }
    if body.password.len() < 8 {
        return Err(AuthError::InvalidInput(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if body.password != body.password2 {
        return Err(AuthError::InvalidInput(
            "passwords do not match".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register - Create a new user account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    validate_registration(&body)?;

    let username = body.username.trim().to_string();
    let email = body.email.trim().to_lowercase();

    if state
        .user_repo
        .find_by_username(&username)
        .await
        .map_err(AuthError::from)?
        .is_some()
    {
        return Err(AuthError::UsernameTaken.into());
    }
    if state
        .user_repo
        .find_by_email(&email)
        .await
        .map_err(AuthError::from)?
        .is_some()
    {
        return Err(AuthError::EmailTaken.into());
    }

    let password_hash = hash_password(&body.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let user = User {
        id: Uuid::now_v7(),
        username,
        email,
        password_hash,
        created_at: Utc::now(),
    };
    let created = state
        .user_repo
        .create(&user)
        .await
        .map_err(AuthError::from)?;

    tracing::info!(user_id = %created.id, "User registered");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(UserProfile::from(&created), request_id, elapsed)
        .with_link("login", "/api/v1/auth/login");

    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/auth/login - Verify credentials and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let email = body.email.trim().to_lowercase();
    let user = state
        .user_repo
        .find_by_email(&email)
        .await
        .map_err(AuthError::from)?
        .ok_or(AuthError::InvalidCredentials)?;

    let matches = verify_password(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !matches {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = issue_token(&state.db_pool, &user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        LoginResponse {
            token,
            username: user.username,
            email: user.email,
        },
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// POST /api/v1/auth/logout - Revoke a session token.
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let removed = revoke_token(&state.db_pool, &body.token).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"logged_out": removed}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
