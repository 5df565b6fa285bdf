//! Infrastructure Layer
//!
//! HTTP access to the trade review API, configuration and logging setup.

pub mod client;
pub mod config;
pub mod logging;

pub use client::{ApiClient, ApiError};
pub use config::{
    ApiConfig, ConfigError, DashboardConfig, PendingOrdersConfig, ReconnectConfig,
    SnapshotConfig, StreamConfig,
};
pub use logging::{init_file_tracing, init_tracing};
