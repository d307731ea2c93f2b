//! Conversation state and orchestration.
//!
//! - [`repository`]: the ConversationRepository port.
//! - [`context`]: bounded context-window construction for the outbound call.
//! - [`service`]: the ChatService orchestrating a send-message exchange.

pub mod context;
pub mod repository;
pub mod service;
