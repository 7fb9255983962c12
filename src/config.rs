use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{EventDripperError, Result};
use crate::utils::get_env_with_prefix;

/// Production Event Dripper API host.
pub const DEFAULT_API_HOST: &str = "https://api.production.event-dripper.haps.pw";

/// Configuration for processes embedding Event Dripper.
///
/// Webhook verification itself takes no configuration; the freshness window
/// and scheme version are constants in [`crate::webhooks`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Settings for [`EventClient`](crate::EventClient).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.client.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.config.client.host = host.into();
        self
    }

    pub fn with_client_timeout(mut self, timeout: Duration) -> Self {
        self.config.client.timeout_seconds = timeout.as_secs();
        self
    }

    /// Load configuration from environment variables with EVENTDRIPPER_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        if let Some(api_key) = get_env_with_prefix("API_KEY") {
            self.config.client.api_key = Some(api_key);
        }
        if let Some(host) = get_env_with_prefix("API_HOST") {
            self.config.client.host = host;
        }
        if let Some(timeout) = get_env_with_prefix("CLIENT_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.config.client.timeout_seconds = secs;
            }
        }

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The log level is not one of trace, debug, info, warn, error
    /// - The API host is not an http(s) URL
    /// - The client timeout is zero
    pub fn build(self) -> Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(EventDripperError::config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let host = &self.config.client.host;
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(EventDripperError::config(format!(
                "API host must be an http(s) URL, got: {}",
                host
            )));
        }

        if self.config.client.timeout_seconds == 0 {
            return Err(EventDripperError::config(
                "Client timeout must be greater than 0",
            ));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
