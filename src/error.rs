//! NoteChat error types

use thiserror::Error;

/// NoteChat error type
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was empty
    #[error("{0}")]
    Validation(String),

    /// Bad or missing credential
    #[error("{0}")]
    Auth(String),

    /// Unknown note id
    #[error("{0}")]
    NotFound(String),

    /// Configuration error (including a missing upstream API key)
    #[error("{0}")]
    Config(String),

    /// Upstream generation API answered with a non-success status
    #[error("API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// Network-level failure talking to the upstream API
    #[error("{0}")]
    Transport(String),

    /// Upstream payload did not have the expected shape
    #[error("{0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code for API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "BAD_REQUEST",
            Self::Auth(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Io(_) | Self::Serialization(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Map reqwest failures onto the transport/parse split.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else if e.is_timeout() {
            Self::Transport(format!("timeout: {}", e))
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Result type alias for NoteChat operations
pub type Result<T> = std::result::Result<T, Error>;
