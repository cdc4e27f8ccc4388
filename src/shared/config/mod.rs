//! Application configuration module
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment overrides. `AppConfigBuilder` assembles and validates them.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Backend used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
/// Conversation list polling period
pub const DEFAULT_CONVERSATION_POLL_MS: u64 = 10_000;
/// Active conversation message polling period
pub const DEFAULT_MESSAGE_POLL_MS: u64 = 5_000;

/// Environment variable overriding the server URL
pub const ENV_API_URL: &str = "MARKETSYNC_API_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend base URL
    pub server_url: String,
    /// Conversation list polling period in milliseconds
    pub conversation_poll_ms: u64,
    /// Message polling period in milliseconds
    pub message_poll_ms: u64,
    /// Transport timeout in milliseconds; `None` leaves it to the transport
    pub request_timeout_ms: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            conversation_poll_ms: DEFAULT_CONVERSATION_POLL_MS,
            message_poll_ms: DEFAULT_MESSAGE_POLL_MS,
            request_timeout_ms: None,
        }
    }
}

/// On-disk shape; every field is optional so partial files work
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    server_url: Option<String>,
    conversation_poll_ms: Option<u64>,
    message_poll_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Default config file location (`<config dir>/marketsync/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("marketsync").join("config.toml"))
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw)?.with_env_overrides().build()
    }

    /// Load from the default path when it exists, defaults otherwise
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => AppConfig::builder().with_env_overrides().build(),
        }
    }

    /// Parse TOML into a builder seeded with its values
    pub fn from_toml_str(raw: &str) -> Result<AppConfigBuilder, ConfigError> {
        let file: FileConfig =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(AppConfigBuilder {
            server_url: file.server_url,
            conversation_poll_ms: file.conversation_poll_ms,
            message_poll_ms: file.message_poll_ms,
            request_timeout_ms: file.request_timeout_ms,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.conversation_poll_ms == 0 {
            return Err(ConfigError::InvalidValue("conversation_poll_ms"));
        }
        if self.message_poll_ms == 0 {
            return Err(ConfigError::InvalidValue("message_poll_ms"));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue("request_timeout_ms"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    conversation_poll_ms: Option<u64>,
    message_poll_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn conversation_poll_ms(mut self, ms: u64) -> Self {
        self.conversation_poll_ms = Some(ms);
        self
    }

    pub fn message_poll_ms(mut self, ms: u64) -> Self {
        self.message_poll_ms = Some(ms);
        self
    }

    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = Some(ms);
        self
    }

    /// Apply `MARKETSYNC_API_URL` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.server_url = Some(url);
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            conversation_poll_ms: self
                .conversation_poll_ms
                .unwrap_or(defaults.conversation_poll_ms),
            message_poll_ms: self.message_poll_ms.unwrap_or(defaults.message_poll_ms),
            request_timeout_ms: self.request_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {0}")]
    InvalidValue(&'static str),
    #[error("failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}
