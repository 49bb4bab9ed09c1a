//! HTTP handlers for the Notes API
//!
//! Provides 4 REST endpoints, all behind the admin bearer token:
//! - GET    /api/notes       — list notes in insertion order
//! - POST   /api/notes       — create a note
//! - PUT    /api/notes/:id   — update a note
//! - DELETE /api/notes/:id   — delete a note

use crate::api::{error_response, json_body};
use crate::auth::{require_admin, AuthState};
use crate::notes::store::NoteStore;
use crate::notes::types::NoteRequest;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for note handlers
#[derive(Clone)]
pub struct NotesState {
    pub store: Arc<NoteStore>,
}

/// Create the notes router, guarded by the admin token
pub fn notes_router(state: NotesState, auth: AuthState) -> Router {
    Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/:id", put(update_note).delete(delete_note))
        .route_layer(middleware::from_fn_with_state(auth, require_admin))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/notes
async fn list_notes(State(state): State<NotesState>) -> impl IntoResponse {
    Json(state.store.load_all().await)
}

/// POST /api/notes
async fn create_note(
    State(state): State<NotesState>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(body) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };
    match state.store.create(&request.title, &request.content).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT /api/notes/:id
async fn update_note(
    State(state): State<NotesState>,
    Path(id): Path<String>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(body) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };
    match state
        .store
        .update(&id, &request.title, &request.content)
        .await
    {
        Ok(note) => Json(note).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE /api/notes/:id
async fn delete_note(State(state): State<NotesState>, Path(id): Path<String>) -> Response {
    match state.store.delete(&id).await {
        Ok(()) => Json(serde_json::json!({ "success": true })).into_response(),
        Err(e) => error_response(&e),
    }
}
