//! Prompt assembly
//!
//! Splices the stored notes and the user's message into a fixed instruction
//! template. The assistant answers as a general helper that draws on the
//! owner's notes when a question touches them.

use crate::error::{Error, Result};
use crate::notes::Note;

/// Shown in place of the notes block when there are no notes
pub const NO_NOTES_PLACEHOLDER: &str = "No personal notes available yet.";

const PERSONA: &str = "You are a helpful AI assistant. Answer questions naturally and accurately, just like a regular AI assistant would.

You also have access to some personal notes from your owner. When questions relate to this personal information, use it to personalize your responses. For general knowledge questions, answer normally using your training.";

const CLOSING: &str =
    "Be helpful, friendly, and accurate. Answer all questions to the best of your ability.";

/// Render the notes as `### <title>:\n<content>` blocks separated by blank lines
pub fn render_notes(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| format!("### {}:\n{}", n.title, n.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the full prompt for `user_message`
pub fn build(user_message: &str, notes: &[Note]) -> Result<String> {
    let message = user_message.trim();
    if message.is_empty() {
        return Err(Error::Validation("Message is required".to_string()));
    }

    let context = if notes.is_empty() {
        NO_NOTES_PLACEHOLDER.to_string()
    } else {
        render_notes(notes)
    };

    Ok(format!(
        "{PERSONA}\n\n\
         --- PERSONAL NOTES (use when relevant) ---\n\
         {context}\n\
         --- END NOTES ---\n\n\
         {CLOSING}\n\n\
         User: {message}\n\n\
         Response:"
    ))
}
