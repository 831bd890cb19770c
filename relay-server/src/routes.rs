//! Route definitions for the chat relay.
//!
//! Provides the chat endpoint, the end-session endpoint, and health checks.

use crate::completion::CompletionClient;
use crate::faq::FaqTable;
use crate::store::ConversationStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use relay_common::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: ConversationStore,
    pub faq: Arc<FaqTable>,
    pub completion: Arc<dyn CompletionClient>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_role")]
    pub role: String,
    pub conversation_id: String,
}

fn default_role() -> String {
    "user".into()
}

/// Chat response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
}

/// End-session request body.
#[derive(Debug, Deserialize)]
pub struct EndSessionRequest {
    pub conversation_id: String,
}

/// End-session response.
#[derive(Debug, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub conversation_id: String,
    pub ended: bool,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// Build the chat routes.
pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/chat/", post(chat_handler))
        .route("/chat/end", post(end_session_handler))
        .with_state(state)
}

/// Build health check routes.
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/health", get(health_handler))
}

/// Map an error to its HTTP response.
fn error_response(error: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            detail: error.to_string(),
        }),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Handle a chat turn.
///
/// The conversation lock is held for the whole request, including the
/// upstream call, so concurrent requests against the same conversation id
/// are serialized and no turn is lost.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let handle = state.store.get_or_create(&request.conversation_id).await;
    let mut conversation = handle.lock().await;

    if conversation.is_ended() {
        return Err(error_response(&Error::SessionEnded));
    }

    conversation.push(request.role, request.message.clone());

    // FAQ hit short-circuits the upstream call
    if let Some(answer) = state.faq.lookup(&request.message) {
        tracing::debug!(
            conversation_id = %request.conversation_id,
            "Answered from FAQ table"
        );
        conversation.push("assistant", answer);
        return Ok(Json(ChatResponse {
            response: answer.to_string(),
            conversation_id: request.conversation_id,
        }));
    }

    let reply = state
        .completion
        .complete(conversation.turns())
        .await
        .map_err(|e| {
            // The user turn stays appended; only the assistant turn is missing
            tracing::error!(
                error = %e,
                conversation_id = %request.conversation_id,
                "Completion request failed"
            );
            error_response(&e)
        })?;

    conversation.push("assistant", reply.clone());

    Ok(Json(ChatResponse {
        response: reply,
        conversation_id: request.conversation_id,
    }))
}

/// Mark a conversation ended; further chat turns against it are rejected.
async fn end_session_handler(
    State(state): State<AppState>,
    Json(request): Json<EndSessionRequest>,
) -> Result<Json<EndSessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    if !state.store.end(&request.conversation_id).await {
        return Err(error_response(&Error::NotFound(format!(
            "conversation {}",
            request.conversation_id
        ))));
    }

    tracing::info!(conversation_id = %request.conversation_id, "Session ended");

    Ok(Json(EndSessionResponse {
        conversation_id: request.conversation_id,
        ended: true,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Health Handler
// ─────────────────────────────────────────────────────────────────────────────

/// Health check handler.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        service: "relay-server".into(),
    })
}
