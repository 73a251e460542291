//! Route handler functions for the chat endpoints.
//!
//! Each handler extracts path parameters and JSON bodies via axum
//! extractors, calls into the assistant, and returns JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};

use concierge_chat::{check_message_length, parse_sender};
use concierge_core::types::{ConversationMessage, IntentResult};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    pub message: String,
}

/// Body for appending a message to a session without generating a reply.
#[derive(Debug, Deserialize)]
pub struct SaveMessageRequest {
    pub sender: String,
    pub content: String,
    pub suggestions: Option<Vec<String>>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub response: String,
    pub suggestions: Vec<String>,
    pub intent: String,
    pub confidence: f32,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<ConversationMessage>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /chat/sessions
pub async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id: state.assistant.create_session(),
    })
}

/// POST /chat/message - run one exchange and record both sides.
pub async fn chat_message(
    State(state): State<AppState>,
    body: Result<Json<ChatMessageRequest>, JsonRejection>,
) -> Result<Json<ChatMessageResponse>, ApiError> {
    let Json(body) = body?;
    check_message_length(&body.message, state.config.chat.max_message_length)?;

    let reply = state
        .assistant
        .exchange(body.session_id.as_deref(), &body.message);

    Ok(Json(ChatMessageResponse {
        response: reply.response,
        suggestions: reply.suggestions,
        intent: reply.intent.intent,
        confidence: reply.intent.confidence,
        session_id: reply.session_id,
    }))
}

/// GET /chat/sessions/{id}/history
pub async fn chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        messages: state.assistant.get_chat_history(&session_id),
    })
}

/// POST /chat/sessions/{id}/messages
pub async fn save_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Result<Json<SaveMessageRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let sender = parse_sender(&body.sender)?;
    check_message_length(&body.content, state.config.chat.max_message_length)?;

    state.assistant.save_chat_message(
        &session_id,
        sender,
        &body.content,
        body.suggestions.as_deref(),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /chat/intent - classify a message without replying to it.
pub async fn detect_intent(
    State(state): State<AppState>,
    body: Result<Json<IntentRequest>, JsonRejection>,
) -> Result<Json<IntentResult>, ApiError> {
    let Json(body) = body?;
    check_message_length(&body.message, state.config.chat.max_message_length)?;
    Ok(Json(state.assistant.detect_intent(&body.message)))
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
