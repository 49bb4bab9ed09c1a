//! Notes module — the personal notes used as chat context
//!
//! Provides the file-backed note store and the admin-only REST endpoints
//! for listing, creating, updating and deleting notes.

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{notes_router, NotesState};
pub use store::NoteStore;
pub use types::{Note, NoteRequest};
