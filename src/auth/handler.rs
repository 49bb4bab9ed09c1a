//! HTTP handlers for the Auth API
//!
//! Provides 2 REST endpoints and the bearer-token guard:
//! - POST   /api/auth          — exchange the admin password for a token
//! - POST   /api/auth/logout   — revoke the presented token
//!
//! [`require_admin`] is layered onto every route that mutates or lists notes.

use crate::api::{error_response, status_for};
use crate::auth::gate::{AuthGate, AuthOutcome};
use crate::error::Error;
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for auth handlers and the guard
#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<AuthGate>,
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth", post(login))
        .route("/api/auth/logout", post(logout))
        .with_state(state)
}

/// Request body for POST /api/auth
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Response body for POST /api/auth
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth
async fn login(
    State(state): State<AuthState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    // An unreadable body is treated as a wrong password so the reply keeps its shape.
    let password = match body {
        Ok(Json(request)) => request.password,
        Err(rejection) => {
            tracing::debug!("Unreadable login body: {}", rejection.body_text());
            String::new()
        }
    };

    match state.gate.login(&password) {
        Ok(issued) => (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                token: Some(issued.token),
                expires_at: Some(issued.expires_at),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => (
            status_for(&e),
            Json(LoginResponse {
                success: false,
                token: None,
                expires_at: None,
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}

/// POST /api/auth/logout
async fn logout(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    match state.gate.logout(token).await {
        Ok(()) => Json(serde_json::json!({ "success": true })).into_response(),
        Err(e) => {
            tracing::debug!("Logout rejected: {}", e);
            unauthorized()
        }
    }
}

// =============================================================================
// Guard
// =============================================================================

/// Reject requests without a valid `Authorization: Bearer <token>` header
pub async fn require_admin(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let outcome = match bearer_token(request.headers()) {
        Some(token) => state.gate.check(token).await,
        None => AuthOutcome::Rejected {
            reason: "missing bearer token".to_string(),
        },
    };

    match outcome {
        AuthOutcome::Authenticated { .. } => next.run(request).await,
        AuthOutcome::Rejected { reason } => {
            tracing::debug!(path = %request.uri().path(), "Unauthorized request: {}", reason);
            unauthorized()
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthorized() -> Response {
    error_response(&Error::Auth("Unauthorized".to_string()))
}
