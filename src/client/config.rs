//! Client configuration wrapper.
//!
//! Turns the validated [`AppConfig`] into what the client needs at runtime:
//! endpoint URLs and polling durations.

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::time::Duration;

/// Runtime configuration for the sync client
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        let app = AppConfig::builder()
            .with_env_overrides()
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid environment configuration: {}", e);
                AppConfig::default()
            });
        Self { app }
    }
}

impl Config {
    /// Create a new configuration with default values and environment overrides
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_app(app: AppConfig) -> Self {
        Self { app }
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    /// Load the default config file (if any) plus environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        AppConfig::load_default().map(Self::from_app)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn conversation_poll_interval(&self) -> Duration {
        Duration::from_millis(self.app.conversation_poll_ms)
    }

    pub fn message_poll_interval(&self) -> Duration {
        Duration::from_millis(self.app.message_poll_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.app.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }
}
