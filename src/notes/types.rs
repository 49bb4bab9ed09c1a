//! Note wire types
//!
//! A note is persisted and served with the same shape:
//! `{ "id": ..., "title": ..., "content": ... }`.

use serde::{Deserialize, Serialize};

/// Title given to notes created without one
pub const DEFAULT_TITLE: &str = "Untitled";

/// A titled block of free text used as chat context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    pub content: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// Request body for creating or updating a note
///
/// Missing fields deserialize as empty strings so that an absent `content`
/// is reported as a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}
