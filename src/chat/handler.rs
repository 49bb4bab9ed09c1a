//! HTTP handlers for the public Chat API
//!
//! Provides 2 REST endpoints, both unauthenticated:
//! - POST   /api/chat     — answer a message using the stored notes
//! - GET    /api/health   — liveness + whether the upstream key is set

use crate::api::{error_response, json_body};
use crate::chat::service::ChatService;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for chat handlers
#[derive(Clone)]
pub struct ChatState {
    pub service: Arc<ChatService>,
}

/// Create the chat + health router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Request body for POST /api/chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Response body for POST /api/chat
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Response body for GET /api/health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub gemini_configured: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/chat
async fn chat(
    State(state): State<ChatState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    match answer(&state.service, body).await {
        Ok(response) => Json(ChatResponse { response }).into_response(),
        Err(e) => error_response(&e),
    }
}

/// The key check runs before the body is looked at, so an unconfigured
/// server answers with a configuration error whatever was posted.
async fn answer(
    service: &ChatService,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> crate::Result<String> {
    service.ensure_configured()?;
    let request = json_body(body)?;
    service.answer(&request.message).await
}

/// GET /api/health
async fn health(State(state): State<ChatState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        gemini_configured: state.service.is_configured(),
    })
}
