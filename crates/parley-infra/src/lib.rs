//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`:
//! SQLite storage, the Gemini completion gateway, Argon2 password hashing,
//! and the environment-driven application configuration.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
