//! Chat request pipeline
//!
//! `Idle → ValidatingInput → BuildingPrompt → Proxying → done`, one attempt
//! per request. A missing upstream key short-circuits before the message is
//! looked at, so an unconfigured server reports the configuration problem
//! for every message.

use crate::chat::prompt;
use crate::chat::proxy::ChatBackend;
use crate::error::{Error, Result};
use crate::notes::NoteStore;
use std::sync::Arc;

/// Answers chat messages using the stored notes as context
pub struct ChatService {
    store: Arc<NoteStore>,
    backend: Arc<dyn ChatBackend>,
}

impl ChatService {
    pub fn new(store: Arc<NoteStore>, backend: Arc<dyn ChatBackend>) -> Self {
        Self { store, backend }
    }

    /// Whether the upstream backend has credentials
    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    /// Fail with a configuration error when no upstream key is set
    pub fn ensure_configured(&self) -> Result<()> {
        if !self.backend.is_configured() {
            return Err(Error::Config("Gemini API key not configured".to_string()));
        }
        Ok(())
    }

    /// Answer one user message
    pub async fn answer(&self, message: &str) -> Result<String> {
        self.ensure_configured()?;

        let notes = self.store.load_all().await;
        let full_prompt = prompt::build(message, &notes)?;

        tracing::debug!(
            notes = notes.len(),
            prompt_len = full_prompt.len(),
            "Built chat prompt"
        );

        match self.backend.send(&full_prompt).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::error!(code = e.code(), "Chat proxy failed: {}", e);
                Err(e)
            }
        }
    }
}
