//! GeminiGateway -- concrete [`CompletionGateway`] implementation for Google Gemini.
//!
//! Sends requests to the generateContent endpoint with the API key in the
//! `x-goog-api-key` header. The key is wrapped in [`secrecy::SecretString`]
//! and is never logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::CompletionGateway;
use parley_types::error::GatewayError;
use parley_types::llm::PromptTurn;

use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Reply returned when the model answers with an empty or filtered response.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process that. Please try again.";

/// Google Gemini completion gateway.
///
/// Implements [`CompletionGateway`] for the generateContent API.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiGateway {
    /// The default model when none is configured.
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";

    /// Create a new Gemini gateway.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-1.5-flash")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model,
        }
    }

    /// The configured model for this gateway.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full generateContent URL for the configured model.
    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

// GeminiGateway intentionally does NOT derive Debug so the internal state
// (including the SecretString key) never reaches logs or panics.

impl CompletionGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, turns: &[PromptTurn]) -> Result<String, GatewayError> {
        let body = GenerateContentRequest::from_turns(turns);
        let url = self.url();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let gemini_resp: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(format!("failed to parse response: {e}")))?;

        // A well-formed response with nothing in it (safety filtering, empty
        // generation) gets a canned reply rather than an error.
        Ok(gemini_resp
            .first_candidate_text()
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_gateway() -> GeminiGateway {
        GeminiGateway::new(
            SecretString::from("test-key-not-real"),
            GeminiGateway::DEFAULT_MODEL.to_string(),
        )
    }

    #[test]
    fn test_gateway_name() {
        assert_eq!(make_gateway().name(), "gemini");
    }

    #[test]
    fn test_default_url() {
        let gateway = make_gateway();
        assert_eq!(
            gateway.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_base_url_override() {
        let gateway = make_gateway().with_base_url("http://localhost:8080".to_string());
        assert_eq!(
            gateway.url(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_model_accessor() {
        let gateway = GeminiGateway::new(
            SecretString::from("test-key"),
            "gemini-1.5-pro".to_string(),
        );
        assert_eq!(gateway.model(), "gemini-1.5-pro");
    }
}
