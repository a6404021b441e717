//! The conversation collaborator seen by the rest of the app.

use bevy::prelude::*;
use simulation::time_of_day::TimeCategory;

use crate::error::ConversationError;

/// Shown in place of a reply when a turn fails.
pub const FALLBACK_REPLY: &str = "The wind is loud... I cannot hear you.";
/// Shown when the remote answers with nothing.
pub const EMPTY_REPLY: &str = "...";

/// One conversation with the persona. Calls block; the plugin runs them on
/// the async compute pool.
pub trait ConversationSession: Send + 'static {
    /// Open a fresh conversation and return the persona's first line.
    fn start(&mut self, category: TimeCategory) -> Result<String, ConversationError>;

    /// Send one user turn (already carrying its context tag).
    fn send(&mut self, text: &str) -> Result<String, ConversationError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Collapse a turn result into the line the player sees.
pub fn reply_or_fallback(result: Result<String, ConversationError>) -> String {
    match result {
        Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
        Ok(text) => text,
        Err(ConversationError::EmptyResponse) => EMPTY_REPLY.to_string(),
        Err(err) => {
            warn!("Conversation turn failed: {err}");
            FALLBACK_REPLY.to_string()
        }
    }
}
