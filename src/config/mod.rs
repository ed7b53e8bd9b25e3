use crate::constants::{self, env_vars};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::get_config_path;
pub use paths::get_log_dir_path;
use validation::validate_config;

/// Backend environment the client talks to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Configuration for the HTTP client layer.
/// Handles loading, saving, and environment selection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Which backend environment to target
    #[serde(default)]
    pub environment: Environment,
    /// Base URL of the development backend. Should include https:// prefix.
    pub development_url: String,
    /// Base URL of the production backend. Should include https:// prefix.
    pub production_url: String,
    /// Path to the log file. If not specified, logs go to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests. Defaults to 20 seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Maximum pooled connections per host. Defaults to 3.
    #[serde(default = "default_max_connections")]
    pub max_connections_per_host: usize,
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

/// Default per-host connection cap
fn default_max_connections() -> usize {
    constants::MAX_CONNECTIONS_PER_HOST
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: Environment::Development,
            development_url: String::new(),
            production_url: String::new(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            max_connections_per_host: default_max_connections(),
        }
    }
}

impl Config {
    /// Base URL for the selected environment
    pub fn base_url(&self) -> &str {
        match self.environment {
            Environment::Development => &self.development_url,
            Environment::Production => &self.production_url,
        }
    }

    /// Loads configuration from the default config file location.
    /// Environment variables override config file values.
    ///
    /// # Environment Variables
    /// - `CARELINK_ENV` - Select environment (`development` / `production`)
    /// - `CARELINK_API_URL` - Override the base URL of the selected environment
    /// - `CARELINK_LOG_FILE` - Override log file path
    /// - `CARELINK_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    pub async fn load() -> Result<Self, ApiError> {
        Self::load_from_path(&get_config_path()).await
    }

    /// Loads configuration from an explicit path, applying the same
    /// environment-variable overrides as [`Config::load`].
    pub async fn load_from_path(config_path: &str) -> Result<Self, ApiError> {
        let mut config: Config = if Path::new(config_path).exists() {
            let content = fs::read_to_string(config_path).await?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(env) = std::env::var(env_vars::ENVIRONMENT) {
            config.environment = Environment::parse(&env).ok_or_else(|| {
                ApiError::config_error(format!("Unknown environment '{env}'"))
            })?;
        }

        if let Ok(api_url) = std::env::var(env_vars::API_URL) {
            match config.environment {
                Environment::Development => config.development_url = api_url,
                Environment::Production => config.production_url = api_url,
            }
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        validate_config(
            config.base_url(),
            config.http_timeout_seconds,
            config.max_connections_per_host,
            &config.log_file_path,
        )?;

        Ok(config)
    }

    /// Saves the configuration to the default config file location as TOML.
    pub async fn save(&self) -> Result<(), ApiError> {
        self.save_to_path(&get_config_path()).await
    }

    /// Saves the configuration to an explicit path as TOML.
    pub async fn save_to_path(&self, config_path: &str) -> Result<(), ApiError> {
        if let Some(parent) = Path::new(config_path).parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(config_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
