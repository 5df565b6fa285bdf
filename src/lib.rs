//! Trade Review Dashboard - Main Library
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **dashboard**: Views, API client, configuration and TUI (re-exported from workspace)
//! - **sse_client**: Server-sent events client (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use trade_review_dashboard::bin_common::{load_config_from_env, ConfigType};
//! use trade_review_dashboard::dashboard::DashboardConfig;
//! ```

// Re-export workspace libraries for convenience
pub use dashboard;
pub use sse_client;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{config_type_from_args, load_config_from_env, parse_args, ConfigType};
    pub use runner::{BinaryRunner, Heartbeat, RunConfig};
}
