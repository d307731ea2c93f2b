//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Gateway and persistence failures are reported as opaque 5xx responses;
//! the underlying detail goes to the logs, never to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{AuthError, ChatError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat orchestration errors.
    Chat(ChatError),
    /// Registration/login errors.
    Auth(AuthError),
    /// Authentication failure (missing or invalid token).
    Unauthorized(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Chat(ChatError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Not found".to_string())
            }
            AppError::Chat(ChatError::Gateway(e)) => {
                tracing::error!(error = %e, "Completion gateway failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GATEWAY_ERROR",
                    "The assistant is unavailable right now".to_string(),
                )
            }
            AppError::Chat(ChatError::Persistence(e)) => {
                tracing::error!(error = %e, "Persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                )
            }
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            AppError::Auth(AuthError::UsernameTaken) => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                "Username already exists".to_string(),
            ),
            AppError::Auth(AuthError::EmailTaken) => (
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                "An account with this email already exists".to_string(),
            ),
            AppError::Auth(AuthError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(AuthError::Persistence(e)) => {
                tracing::error!(error = %e, "Persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                )
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                )
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
