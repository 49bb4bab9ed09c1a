//! NoteChat - Personal notes-backed chatbot
//!
//! NoteChat keeps a short list of personal notes in a JSON file, lets the
//! owner manage them behind an admin password, and answers chat messages by
//! forwarding them to an upstream LLM with the notes injected as context.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     HTTP API (axum)                       │
//! │   /api/auth      /api/notes (bearer)     /api/chat        │
//! └──────┬──────────────────┬──────────────────────┬─────────┘
//!        │                  │                      │
//! ┌──────▼──────┐   ┌───────▼───────┐     ┌────────▼────────┐
//! │  Auth Gate  │   │  Note Store   │────▶│ Prompt Builder  │
//! │ signed token│   │  notes.json   │     └────────┬────────┘
//! └─────────────┘   └───────────────┘     ┌────────▼────────┐
//!                                         │   Chat Proxy    │──▶ Gemini
//!                                         └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`notes`]: note store and admin CRUD endpoints
//! - [`auth`]: admin password gate and bearer tokens
//! - [`chat`]: prompt assembly, upstream client and chat endpoint
//! - [`api`]: unified router, CORS and error bodies
//! - [`config`]: configuration management

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod notes;

pub use config::NoteChatConfig;
pub use error::{Error, Result};
