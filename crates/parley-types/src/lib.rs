//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley backend:
//! User, Conversation, Message, prompt turns, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod identity;
pub mod llm;
