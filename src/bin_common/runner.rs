//! Binary runner utilities
//!
//! Provides a standardized way to run headless binaries with logging
//! banners, a heartbeat, and graceful shutdown.

use std::time::{Duration, Instant};
use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Main loop interval (if applicable)
    pub loop_interval_secs: Option<f64>,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heartbeat_interval_secs: 60,
            loop_interval_secs: None,
        }
    }

    /// Set heartbeat interval
    pub fn with_heartbeat(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = secs;
        self
    }

    /// Set loop interval
    pub fn with_loop_interval(mut self, secs: f64) -> Self {
        self.loop_interval_secs = Some(secs);
        self
    }

    pub fn loop_interval(&self) -> Duration {
        Duration::from_secs_f64(self.loop_interval_secs.unwrap_or(0.25).max(0.01))
    }
}

/// Tracks when the next heartbeat line is due
#[derive(Debug)]
pub struct Heartbeat {
    interval: Duration,
    last: Instant,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    pub fn should_beat(&self) -> bool {
        self.last.elapsed() >= self.interval
    }

    pub fn beat(&mut self) {
        self.last = Instant::now();
    }
}

/// Trait for headless binary applications
pub trait BinaryRunner {
    /// Run the application main loop until shutdown
    async fn run(&mut self) -> anyhow::Result<()>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    /// Final stats line for the shutdown banner
    fn summary(&self) -> Option<String> {
        None
    }

    /// Print startup banner
    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        info!("Heartbeat: every {}s", config.heartbeat_interval_secs);
        info!("Press Ctrl+C to stop");
        info!("========================================");
        info!("");
    }

    /// Print shutdown banner
    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} stopped gracefully", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with proper initialization and cleanup
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let result = self.run().await;
        self.print_shutdown(self.summary().as_deref());
        result
    }
}
