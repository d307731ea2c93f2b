//! Bearer token authentication extractor.
//!
//! Extracts the session token from the `Authorization: Bearer <token>`
//! header, hashes it, and resolves the owning user against the
//! `auth_tokens` table. Plaintext tokens are never stored.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::Row;
use uuid::Uuid;

use parley_infra::crypto::token::hash_token;
use parley_infra::sqlite::pool::DatabasePool;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated user. Extracting this validates the bearer token and
/// yields the owning user's id.
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let token_hash = hash_token(&token);

        let result = sqlx::query("SELECT id, user_id FROM auth_tokens WHERE token_hash = ?")
            .bind(&token_hash)
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        match result {
            Some(row) => {
                let user_id: String = row.get("user_id");
                let user_id = Uuid::parse_str(&user_id)
                    .map_err(|e| AppError::Internal(format!("Corrupt token row: {e}")))?;

                // Update last_used_at (best effort, don't fail the request)
                let id: String = row.get("id");
                let now = chrono::Utc::now().to_rfc3339();
                let _ = sqlx::query("UPDATE auth_tokens SET last_used_at = ? WHERE id = ?")
                    .bind(&now)
                    .bind(&id)
                    .execute(&state.db_pool.writer)
                    .await;

                Ok(AuthUser(user_id))
            }
            None => Err(AppError::Unauthorized(
                "Invalid session token. Provide a valid token via 'Authorization: Bearer <token>'."
                    .to_string(),
            )),
        }
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(AppError::Unauthorized(
        "Missing session token. Provide via 'Authorization: Bearer <token>' header.".to_string(),
    ))
}

/// Issue a new session token for a user and store its hash.
///
/// Returns the plaintext token, shown to the client once.
pub async fn issue_token(pool: &DatabasePool, user_id: &Uuid) -> Result<String, AppError> {
    let token = parley_infra::crypto::token::generate_token();
    let token_hash = hash_token(&token);
    let id = Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO auth_tokens (id, user_id, token_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id.to_string())
    .bind(&token_hash)
    .bind(&now)
    .execute(&pool.writer)
    .await
    .map_err(|e| AppError::Internal(format!("Failed to store session token: {e}")))?;

    Ok(token)
}

/// Delete the session token with the given plaintext value.
///
/// Returns whether a token was actually removed.
pub async fn revoke_token(pool: &DatabasePool, token: &str) -> Result<bool, AppError> {
    let token_hash = hash_token(token);
    let result = sqlx::query("DELETE FROM auth_tokens WHERE token_hash = ?")
        .bind(&token_hash)
        .execute(&pool.writer)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to revoke session token: {e}")))?;

    Ok(result.rows_affected() > 0)
}
