//! Conversation and message exchange handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use parley_types::chat::{ChatReply, Conversation, ConversationDetail};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for creating a conversation.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    /// Optional title; blank or absent falls back to the default.
    #[serde(default)]
    pub title: Option<String>,
}

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/conversations - Create a new conversation.
pub async fn create_conversation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Conversation>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let conversation = state
        .chat_service
        .create_conversation(&user_id, body.title)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let self_link = format!("/api/v1/conversations/{}", conversation.id);
    let resp =
        ApiResponse::success(conversation, request_id, elapsed).with_link("self", &self_link);

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/conversations - List the caller's conversations.
pub async fn list_conversations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let conversations = state.chat_service.list_conversations(&user_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(conversations, request_id, elapsed)
        .with_link("self", "/api/v1/conversations");

    Ok(Json(resp))
}

/// GET /api/v1/conversations/:id - Get a conversation with its message log.
pub async fn get_conversation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ConversationDetail>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let detail = state
        .chat_service
        .get_conversation(&user_id, &conversation_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(detail, request_id, elapsed)
        .with_link("self", &format!("/api/v1/conversations/{conversation_id}"));

    Ok(Json(resp))
}

/// DELETE /api/v1/conversations/:id - Delete a conversation and its messages.
pub async fn delete_conversation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .chat_service
        .delete_conversation(&user_id, &conversation_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "conversation_id": conversation_id.to_string()}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// POST /api/v1/conversations/:id/messages - Send a message and get the reply.
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(conversation_id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let reply = state
        .chat_service
        .send_message(&user_id, &conversation_id, &body.message)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(reply, request_id, elapsed)
        .with_link("conversation", &format!("/api/v1/conversations/{conversation_id}"));

    Ok(Json(resp))
}
