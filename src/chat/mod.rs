//! Chat module — prompt assembly and the upstream generation API
//!
//! Stored notes are spliced into a fixed prompt template and forwarded to
//! the Gemini `generateContent` endpoint. Chat is public; it never needs the
//! admin token.

pub mod handler;
pub mod prompt;
pub mod proxy;
pub mod service;

pub use handler::{chat_router, ChatState};
pub use proxy::{ChatBackend, GeminiClient};
pub use service::ChatService;
