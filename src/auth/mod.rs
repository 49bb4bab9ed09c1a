//! Auth module — admin password gate and bearer tokens
//!
//! The admin password is exchanged once for a signed, expiring token. Note
//! endpoints require that token; chat and health stay public.

pub mod gate;
pub mod handler;
pub mod token;

pub use gate::{AuthGate, AuthOutcome, IssuedToken};
pub use handler::{auth_router, require_admin, AuthState};
pub use token::TokenSigner;
