//! Prompt types for the external completion provider.
//!
//! A conversation's message log is converted into a bounded sequence of
//! [`PromptTurn`]s before the outbound completion call. The roles here are
//! the provider-facing tags, not the stored [`crate::chat::Sender`] values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chat::{Message, Sender};

/// Provider-facing role tag for a prompt turn.
///
/// Gemini expects `"user"` and `"model"`; the stored `assistant` sender maps
/// to `Model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    User,
    Model,
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptRole::User => write!(f, "user"),
            PromptRole::Model => write!(f, "model"),
        }
    }
}

/// A single role-tagged utterance sent to the completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTurn {
    pub role: PromptRole,
    pub text: String,
}

impl From<&Message> for PromptTurn {
    fn from(message: &Message) -> Self {
        let role = match message.sender {
            Sender::User => PromptRole::User,
            Sender::Assistant => PromptRole::Model,
        };
        Self {
            role,
            text: message.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_message(sender: Sender, body: &str) -> Message {
        Message {
            id: Uuid::now_v7(),
            conversation_id: Uuid::now_v7(),
            seq: 0,
            sender,
            body: body.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_sender_maps_to_user_role() {
        let turn = PromptTurn::from(&make_message(Sender::User, "hello"));
        assert_eq!(turn.role, PromptRole::User);
        assert_eq!(turn.text, "hello");
    }

    #[test]
    fn test_assistant_sender_maps_to_model_role() {
        let turn = PromptTurn::from(&make_message(Sender::Assistant, "hi"));
        assert_eq!(turn.role, PromptRole::Model);
    }

    #[test]
    fn test_prompt_role_serde() {
        let json = serde_json::to_string(&PromptRole::Model).unwrap();
        assert_eq!(json, "\"model\"");
    }
}
