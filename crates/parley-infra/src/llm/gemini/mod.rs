//! Google Gemini completion gateway.

pub mod client;
pub mod types;

pub use client::GeminiGateway;
