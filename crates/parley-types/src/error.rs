use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the external completion provider.
///
/// Any of these aborts the orchestration; the user's turn stays persisted.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Errors surfaced by the chat orchestration layer.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found")]
    NotFound,

    #[error("completion gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("persistence error: {0}")]
    Persistence(RepositoryError),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound,
            other => ChatError::Persistence(other),
        }
    }
}

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username already exists")]
    UsernameTaken,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Http {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn test_repo_not_found_maps_to_chat_not_found() {
        let err = ChatError::from(RepositoryError::NotFound);
        assert!(matches!(err, ChatError::NotFound));
    }

    #[test]
    fn test_repo_query_maps_to_persistence() {
        let err = ChatError::from(RepositoryError::Query("boom".to_string()));
        assert!(matches!(err, ChatError::Persistence(_)));
    }

    #[test]
    fn test_gateway_error_wraps() {
        let err = ChatError::from(GatewayError::Network("timeout".to_string()));
        assert!(matches!(err, ChatError::Gateway(_)));
    }
}
