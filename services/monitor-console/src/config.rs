//! Configuration types for the monitor console

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub login: LoginConfig,
}

/// Where the monitor server lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Status poller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval(),
        }
    }
}

/// Login retry policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Maximum number of prompts before giving up (None for unlimited)
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_base_url() -> String {
    "http://localhost:80/".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_poll_interval() -> u64 {
    2000
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::ConsoleError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    if config.poller.interval_ms == 0 {
        return Err(crate::ConsoleError::Config(
            "poller.interval_ms must be greater than zero".to_string(),
        ));
    }
    if config.server.request_timeout_seconds == 0 {
        return Err(crate::ConsoleError::Config(
            "server.request_timeout_seconds must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}
