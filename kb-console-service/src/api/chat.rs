//! Chat API endpoints.
//!
//! Each question is forwarded to the retrieval backend; both sides of the
//! exchange are recorded in the caller's session.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::ServiceError;
use crate::session::{ChatMessage, Role};

use super::AppState;

/// Request to ask a question
#[derive(Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first message; the response carries the issued id.
    pub session_id: Option<String>,
    pub message: String,
}

/// Answer from the retrieval backend
#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
}

/// Session history snapshot
#[derive(Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

/// Response for clearing a session
#[derive(Serialize)]
pub struct ClearResponse {
    pub success: bool,
}

/// Ask a question about the uploaded documents
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServiceError> {
    if request.message.trim().is_empty() {
        return Err(ServiceError::InvalidRequest {
            message: "message must not be empty".to_string(),
        });
    }

    let session_id = match request.session_id {
        Some(id) if state.sessions.exists(&id) => id,
        Some(id) => return Err(ServiceError::SessionNotFound { session_id: id }),
        None => state.sessions.create(),
    };

    debug!(
        session_id = %session_id,
        message_preview = %request.message.chars().take(100).collect::<String>(),
        "Forwarding chat message"
    );

    // The user message stays in the history even if retrieval fails, so a
    // retried question shows up once per attempt, as the user sent it.
    state
        .sessions
        .append(&session_id, Role::User, request.message.clone());

    let answer = state.kb_client.retrieve(&request.message).await?;

    state
        .sessions
        .append(&session_id, Role::Assistant, answer.clone());

    Ok(Json(ChatResponse {
        session_id,
        response: answer,
    }))
}

/// Get a session's chat history
pub async fn get_chat_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, ServiceError> {
    let messages = state
        .sessions
        .history(&session_id)
        .ok_or_else(|| ServiceError::SessionNotFound {
            session_id: session_id.clone(),
        })?;

    Ok(Json(HistoryResponse {
        session_id,
        messages,
    }))
}

/// Clear a session's chat history
pub async fn clear_chat_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearResponse>, ServiceError> {
    if !state.sessions.clear(&session_id) {
        return Err(ServiceError::SessionNotFound { session_id });
    }

    Ok(Json(ClearResponse { success: true }))
}
