//! CompletionGateway trait definition.
//!
//! The gateway is the single seam to the external completion provider:
//! one synchronous request/response round trip per call, no retry, no
//! streaming. Implementations live in parley-infra (e.g., `GeminiGateway`).

use parley_types::error::GatewayError;
use parley_types::llm::PromptTurn;

/// Client abstraction for the external completion provider.
pub trait CompletionGateway: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the turns as the full prompt context and return the reply text.
    ///
    /// A well-formed response with no usable candidate resolves to a fixed
    /// fallback string rather than an error; everything else that goes wrong
    /// surfaces as [`GatewayError`].
    fn complete(
        &self,
        turns: &[PromptTurn],
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
