//! Bounded context-window construction.
//!
//! Converts a conversation's message log into the role-tagged prompt payload
//! for the completion call, keeping only the most recent turns. Truncation
//! is lossy and silent: older context is dropped without any signal to the
//! caller. This bounds request size on long conversations and is a
//! documented policy, not an oversight.

use parley_types::chat::Message;
use parley_types::error::ChatError;
use parley_types::llm::PromptTurn;

/// How many trailing turns are sent to the provider by default.
pub const DEFAULT_CONTEXT_TURNS: usize = 20;

/// Build the prompt context from an ordered message log.
///
/// Keeps the last `limit` turns; the newest message (the just-appended user
/// turn) is always included. Logs under the limit pass through unchanged.
///
/// # Errors
///
/// `ChatError::InvalidInput` when `limit` is zero -- a window that cannot
/// hold the triggering turn is a configuration error, not a runtime
/// condition to paper over.
pub fn build_context(messages: &[Message], limit: usize) -> Result<Vec<PromptTurn>, ChatError> {
    if limit < 1 {
        return Err(ChatError::InvalidInput(
            "context window limit must be at least 1".to_string(),
        ));
    }

    let start = messages.len().saturating_sub(limit);
    Ok(messages[start..].iter().map(PromptTurn::from).collect())
}
