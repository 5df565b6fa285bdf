//! Integration test: Configuration utilities
//!
//! Tests the bin_common configuration path resolution.

use trade_review_dashboard::bin_common::{config_type_from_args, load_config_from_env, ConfigType};
use std::env;

#[test]
fn test_dashboard_config_default() {
    // Clear env var to test default
    env::remove_var("DASHBOARD_CONFIG_PATH");

    let config_path = load_config_from_env(ConfigType::Dashboard);
    assert_eq!(config_path.to_str().unwrap(), "config/dashboard.yaml");
}

#[test]
fn test_custom_config() {
    let custom = ConfigType::Custom("custom/path.yaml".to_string());
    let config_path = load_config_from_env(custom);

    assert_eq!(config_path.to_str().unwrap(), "custom/path.yaml");
}

#[test]
fn test_config_type_env_var_names() {
    assert_eq!(ConfigType::Dashboard.env_var_name(), "DASHBOARD_CONFIG_PATH");
}

#[test]
fn test_args_select_custom_file() {
    let args = vec!["--config".to_string(), "staging.yaml".to_string()];
    let config_path = load_config_from_env(config_type_from_args(&args));
    assert_eq!(config_path.to_str().unwrap(), "staging.yaml");
}

#[test]
fn test_sample_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/dashboard.yaml");
    let yaml = std::fs::read_to_string(path).unwrap();
    let config = trade_review_dashboard::dashboard::DashboardConfig::from_yaml_str(&yaml).unwrap();
    assert!(config.validate().is_ok());
}
