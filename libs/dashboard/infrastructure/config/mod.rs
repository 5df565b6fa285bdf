//! Dashboard configuration
//!
//! Loaded from YAML. Every section has defaults, so a missing file or a
//! partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable overriding `api.base_url`
pub const API_BASE_URL_ENV: &str = "DASHBOARD_API_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub stream: StreamConfig,
    pub snapshot: SnapshotConfig,
    pub pending_orders: PendingOrdersConfig,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log file used by the TUI
    pub log_file: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            stream: StreamConfig::default(),
            snapshot: SnapshotConfig::default(),
            pending_orders: PendingOrdersConfig::default(),
            log_level: "info".to_string(),
            log_file: "dashboard.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address every endpoint path is appended to
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub path: String,
    /// Send cookies with the subscription
    pub with_credentials: bool,
    /// Ring buffer capacity
    pub max_events: usize,
    pub reconnect: ReconnectConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            path: "/livestream/stream".to_string(),
            with_credentials: true,
            max_events: 10_000,
            reconnect: ReconnectConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// false = the stream stays closed after a drop
    pub enabled: bool,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// None = retry forever
    pub max_attempts: Option<usize>,
    /// Fraction in [0, 1); 1.0 could shrink a delay to zero
    pub jitter: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            max_attempts: None,
            jitter: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub path: String,
    pub poll_interval_secs: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: "/livestream/latest".to_string(),
            poll_interval_secs: 10,
        }
    }
}

impl SnapshotConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingOrdersConfig {
    pub path: String,
}

impl Default for PendingOrdersConfig {
    fn default() -> Self {
        Self {
            path: "/pending_orders/orders".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file, apply env overrides and validate
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config = Self::from_yaml_str(&yaml_content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file {} not found, using defaults", path.display());
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                info!("Overriding API base URL from environment variable");
                self.api.base_url = base_url.trim().to_string();
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got {}",
                base_url
            )));
        }

        if self.snapshot.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "snapshot.poll_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.stream.max_events == 0 {
            return Err(ConfigError::ValidationError(
                "stream.max_events must be greater than 0".to_string(),
            ));
        }

        let reconnect = &self.stream.reconnect;
        if !(0.0..1.0).contains(&reconnect.jitter) {
            return Err(ConfigError::ValidationError(
                "stream.reconnect.jitter must be in [0, 1)".to_string(),
            ));
        }
        if reconnect.initial_delay_ms > reconnect.max_delay_ms {
            return Err(ConfigError::ValidationError(
                "stream.reconnect.initial_delay_ms must not exceed max_delay_ms".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  API base URL: {}", self.api.base_url);
        info!("  Stream: {} (max {} events)", self.stream.path, self.stream.max_events);
        info!(
            "  Snapshot: {} every {}s",
            self.snapshot.path, self.snapshot.poll_interval_secs
        );
        info!("  Pending orders: {}", self.pending_orders.path);
        info!("  Log level: {}", self.log_level);
    }
}
