//! User identity types.
//!
//! A `User` row is created at registration and never mutated by the chat
//! core. The password hash stays inside the backend; the HTTP layer exposes
//! only the [`UserProfile`] view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user who owns conversations.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized outward.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Outward-facing view of a user, safe to serialize in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}
