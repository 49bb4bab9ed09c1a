//! Unified API router for NoteChat
//!
//! Merges the module routers into a single axum `Router` with CORS, request
//! tracing and a consistent error body.
//!
//! ## Endpoint Map
//!
//! | Path                  | Module | Auth   | Description                |
//! |-----------------------|--------|--------|----------------------------|
//! | `/api/auth`           | auth   | none   | Password → bearer token    |
//! | `/api/auth/logout`    | auth   | bearer | Revoke token               |
//! | `/api/notes`          | notes  | bearer | List / create notes        |
//! | `/api/notes/:id`      | notes  | bearer | Update / delete a note     |
//! | `/api/chat`           | chat   | none   | Notes-aware chat           |
//! | `/api/health`         | chat   | none   | Health probe               |

use crate::auth::{auth_router, AuthGate, AuthState};
use crate::chat::{chat_router, ChatBackend, ChatService, ChatState};
use crate::error::{Error, Result};
use crate::notes::{notes_router, NoteStore, NotesState};
use axum::{
    extract::rejection::JsonRejection,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared components behind the HTTP surface
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<NoteStore>,
    pub gate: Arc<AuthGate>,
    pub backend: Arc<dyn ChatBackend>,
}

/// Build the complete NoteChat HTTP application
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let auth_state = AuthState {
        gate: state.gate.clone(),
    };
    let notes_state = NotesState {
        store: state.store.clone(),
    };
    let chat_state = ChatState {
        service: Arc::new(ChatService::new(state.store, state.backend)),
    };

    Router::new()
        .merge(auth_router(auth_state.clone()))
        .merge(notes_router(notes_state, auth_state))
        .merge(chat_router(chat_state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

// =============================================================================
// Errors
// =============================================================================

/// API error response body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

/// HTTP status for an error kind
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Auth(_) => StatusCode::UNAUTHORIZED,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render an error as `{ "error": <message>, "code": <kind> }`
pub fn error_response(err: &Error) -> Response {
    (
        status_for(err),
        Json(ApiError {
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
        .into_response()
}

/// Unwrap a JSON request body, turning extractor rejections into
/// validation errors so they share the `ApiError` body
pub fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        Error::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}
