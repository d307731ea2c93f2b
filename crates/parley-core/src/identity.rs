//! UserRepository trait definition.
//!
//! Implementations live in parley-infra (e.g., `SqliteUserRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use parley_types::error::RepositoryError;
use parley_types::identity::User;
use uuid::Uuid;

/// Repository trait for user persistence.
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Conflict` on duplicate username or email.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Get a user by id.
    fn get(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by email (used by login).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by username (used by the registration duplicate check).
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
