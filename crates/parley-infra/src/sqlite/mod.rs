//! SQLite-backed persistence.
//!
//! - [`pool`]: split reader/writer connection pool in WAL mode.
//! - [`user`]: `UserRepository` implementation.
//! - [`conversation`]: `ConversationRepository` implementation.

pub mod conversation;
pub mod pool;
pub mod user;
