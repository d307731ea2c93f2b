//! Environment-driven application configuration.
//!
//! All settings come from environment variables. The only required one is
//! `GEMINI_API_KEY`; everything else has a default.
//!
//! - `PARLEY_DATA_DIR`: data directory (default `~/.parley`)
//! - `GEMINI_API_KEY`: Gemini API key (required)
//! - `PARLEY_GEMINI_MODEL`: model identifier (default `gemini-1.5-flash`)
//! - `PARLEY_GEMINI_BASE_URL`: gateway base URL override (default none)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::llm::gemini::GeminiGateway;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Application configuration resolved from the environment.
pub struct AppConfig {
    /// Directory holding the SQLite database.
    pub data_dir: PathBuf,
    /// Gemini API key, never logged.
    pub gemini_api_key: SecretString,
    /// Gemini model identifier.
    pub gemini_model: String,
    /// Optional gateway base URL override (testing, proxies).
    pub gemini_base_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = resolve_data_dir()?;

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingVar("GEMINI_API_KEY"))?;

        let gemini_model = std::env::var("PARLEY_GEMINI_MODEL")
            .unwrap_or_else(|_| GeminiGateway::DEFAULT_MODEL.to_string());

        let gemini_base_url = std::env::var("PARLEY_GEMINI_BASE_URL").ok();

        Ok(Self {
            data_dir,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
        })
    }

    /// The SQLite database URL under the data directory.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}/parley.db", self.data_dir.display())
    }
}

/// Resolve the data directory: `PARLEY_DATA_DIR` if set, else `~/.parley`.
pub fn resolve_data_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("PARLEY_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".parley"))
        .ok_or(ConfigError::NoHomeDir)
}
