//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for lookups,
//! writer for inserts.

use chrono::{DateTime, Utc};
use parley_core::identity::UserRepository;
use parley_types::error::RepositoryError;
use parley_types::identity::User;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

async fn fetch_one_user(
    pool: &DatabasePool,
    sql: &str,
    bind: &str,
) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query(sql)
        .bind(bind)
        .fetch_optional(&pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    match row {
        Some(row) => {
            let user_row =
                UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            Ok(Some(user_row.into_user()?))
        }
        None => Ok(None),
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, username, email, password_hash, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepositoryError::Conflict(e.to_string()))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get(&self, user_id: &Uuid) -> Result<Option<User>, RepositoryError> {
        fetch_one_user(
            &self.pool,
            "SELECT * FROM users WHERE id = ?",
            &user_id.to_string(),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        fetch_one_user(&self.pool, "SELECT * FROM users WHERE email = ?", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        fetch_one_user(
            &self.pool,
            "SELECT * FROM users WHERE username = ?",
            username,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_user(username: &str, email: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = make_user("ada", "ada@example.com");
        repo.create(&user).await.unwrap();

        let found = repo.get(&user.id).await.unwrap().unwrap();
        assert_eq!(found.username, "ada");
        assert_eq!(found.email, "ada@example.com");
        assert_eq!(found.password_hash, "$argon2id$test");
    }

    #[tokio::test]
    async fn test_find_by_email_and_username() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = make_user("grace", "grace@example.com");
        repo.create(&user).await.unwrap();

        let by_email = repo.find_by_email("grace@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, user.id);

        let by_username = repo.find_by_username("grace").await.unwrap();
        assert_eq!(by_username.unwrap().id, user.id);

        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create(&make_user("one", "same@example.com")).await.unwrap();
        let err = repo
            .create(&make_user("two", "same@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create(&make_user("same", "one@example.com")).await.unwrap();
        let err = repo
            .create(&make_user("same", "two@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
