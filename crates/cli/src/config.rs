//! Configuration loading from `.env`, weather-chat.toml and the environment.

use runtime::{DEFAULT_BASE_URL, OrchestratorConfig};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = "weather-chat.toml";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/mcp";

/// Contents of weather-chat.toml. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub base_url: Option<String>,
    /// Used only when `OPENAI_API_KEY` is unset.
    pub api_key: Option<String>,
    #[serde(default)]
    pub chat: OrchestratorConfig,
}

impl FileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub server_url: String,
    pub base_url: String,
    pub chat: OrchestratorConfig,
}

impl Config {
    /// Resolve from `.env`, the optional config file and the process
    /// environment, in increasing precedence.
    pub fn load() -> Result<Self, ConfigError> {
        apply_dotenv(dotenvy::dotenv().map(drop))?;

        let file = if Path::new(CONFIG_FILE).exists() {
            FileConfig::load(CONFIG_FILE)?
        } else {
            FileConfig::default()
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge `file` with variables looked up through `env`.
    ///
    /// Blank variables count as unset.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_key = var("OPENAI_API_KEY")
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut chat = file.chat;
        if let Some(model) = var("OPENAI_MODEL") {
            chat.model = model;
        }

        Ok(Self {
            api_key,
            server_url: var("MCP_SERVER_URL")
                .or(file.server_url)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            base_url: var("OPENAI_BASE_URL")
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            chat,
        })
    }
}

/// A missing .env is fine; an unreadable or malformed one is not.
fn apply_dotenv(loaded: dotenvy::Result<()>) -> Result<(), ConfigError> {
    match loaded {
        Err(e) if e.not_found() => Ok(()),
        other => Ok(other?),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load .env: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("OPENAI_API_KEY is not set (export it or add it to .env)")]
    MissingApiKey,
}
