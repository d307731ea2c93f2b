//! REST API request handlers.

pub mod auth;
pub mod conversation;
