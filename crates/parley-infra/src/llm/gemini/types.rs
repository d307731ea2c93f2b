//! Gemini generateContent API types.
//!
//! These are Gemini-specific request/response structures used for HTTP
//! communication with the generateContent endpoint. They are NOT the generic
//! prompt types from parley-types -- those are gateway-agnostic.

use serde::{Deserialize, Serialize};

use parley_types::llm::PromptTurn;

/// Request body for the Gemini generateContent API.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build a request from gateway-agnostic prompt turns.
    pub fn from_turns(turns: &[PromptTurn]) -> Self {
        let contents = turns
            .iter()
            .map(|t| Content {
                role: t.role.to_string(),
                parts: vec![Part {
                    text: t.text.clone(),
                }],
            })
            .collect();
        Self { contents }
    }
}

/// A single content entry: a role plus its text parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A text part within a content entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Response from the Gemini generateContent API.
///
/// `candidates` can be absent entirely when the model returns nothing
/// (safety filtering, empty generations), so every level is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

/// A single candidate generation.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Extract the text of the first candidate, joining its parts.
    ///
    /// Returns `None` when the response is well-formed but carries no
    /// candidates, no content, or no parts.
    pub fn first_candidate_text(&self) -> Option<String> {
        let candidate = self.candidates.as_ref()?.first()?;
        let content = candidate.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        let text: String = content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        Some(text)
    }
}
