//! CLI utilities for binaries
//!
//! Handles configuration path resolution from arguments and environment
//! variables.

use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigType {
    /// Dashboard configuration (config/dashboard.yaml)
    Dashboard,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Dashboard => "config/dashboard.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        "DASHBOARD_CONFIG_PATH"
    }
}

/// Load configuration path from environment or use default
///
/// A [`ConfigType::Custom`] path always wins over the environment.
///
/// # Examples
/// ```
/// use trade_review_dashboard::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Custom("dev.yaml".to_string()));
/// assert_eq!(path.to_str(), Some("dev.yaml"));
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    if let ConfigType::Custom(path) = config_type {
        return path.into();
    }
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// `--config <path>` (or `--config=<path>`) selects a custom file
pub fn config_type_from_args(args: &[String]) -> ConfigType {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            if let Some(path) = iter.next() {
                return ConfigType::Custom(path.clone());
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return ConfigType::Custom(path.to_string());
        }
    }
    ConfigType::Dashboard
}
