//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! ChatService is generic over repository/gateway traits, but AppState pins it
//! to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::chat::service::ChatService;
use parley_infra::config::AppConfig;
use parley_infra::llm::gemini::GeminiGateway;
use parley_infra::sqlite::conversation::SqliteConversationRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_infra::sqlite::user::SqliteUserRepository;

/// Concrete type alias for the chat service pinned to infra implementations.
pub type ConcreteChatService =
    ChatService<SqliteUserRepository, SqliteConversationRepository, GeminiGateway>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    /// Separate repository instance for auth handlers (chat_service owns its own).
    pub user_repo: Arc<SqliteUserRepository>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    pub gemini_model: String,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::init_with_config(config).await
    }

    /// Initialize from an explicit config (used by tests).
    pub async fn init_with_config(config: AppConfig) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            config.data_dir.join("parley.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let mut gateway =
            GeminiGateway::new(config.gemini_api_key.clone(), config.gemini_model.clone());
        if let Some(base_url) = &config.gemini_base_url {
            gateway = gateway.with_base_url(base_url.clone());
        }

        let chat_service = ChatService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteConversationRepository::new(db_pool.clone()),
            gateway,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            user_repo: Arc::new(SqliteUserRepository::new(db_pool.clone())),
            data_dir: config.data_dir,
            db_pool,
            gemini_model: config.gemini_model,
        })
    }
}
