//! Livestream tail - headless stream viewer
//!
//! Mounts only the stream viewer and logs every event as pretty JSON.

use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use trade_review_dashboard::bin_common::{
    config_type_from_args, load_config_from_env, parse_args, BinaryRunner, Heartbeat, RunConfig,
};
use trade_review_dashboard::dashboard::infrastructure::init_tracing;
use trade_review_dashboard::dashboard::{DashboardConfig, StreamViewer};

struct LivestreamTail {
    run_config: RunConfig,
    viewer: StreamViewer,
    last_seq: u64,
}

impl LivestreamTail {
    fn new(config: &DashboardConfig) -> Self {
        Self {
            run_config: RunConfig::new("Livestream Tail")
                .with_heartbeat(60)
                .with_loop_interval(0.2),
            viewer: StreamViewer::new(&config.api, &config.stream),
            last_seq: 0,
        }
    }

    /// Log events that arrived since the last drain
    fn drain(&mut self) {
        let events = self.viewer.state().read().events_since(self.last_seq);
        for event in events {
            info!("[StreamViewer] #{}\n{}", event.seq, event.pretty());
            self.last_seq = event.seq;
        }
    }

    fn counts(&self) -> String {
        let state = self.viewer.state();
        let state = state.read();
        format!(
            "Events: {} | Rejected: {} | Evicted: {}",
            state.accepted_count(),
            state.rejected_count(),
            state.evicted_count()
        )
    }
}

impl BinaryRunner for LivestreamTail {
    async fn run(&mut self) -> Result<()> {
        info!("[StreamViewer] Tailing {}", self.viewer.url());
        let stream = self.viewer.mount().await?;

        let mut heartbeat = Heartbeat::new(Duration::from_secs(self.run_config.heartbeat_interval_secs));
        let mut ticker = tokio::time::interval(self.run_config.loop_interval());
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, shutting down...");
                    break;
                }
                _ = ticker.tick() => {
                    self.drain();

                    if heartbeat.should_beat() {
                        info!("Heartbeat: {} | Stream: {}", self.counts(), stream.connection_state());
                        heartbeat.beat();
                    }

                    if stream.is_finished() {
                        warn!("[StreamViewer] Subscription closed and will not reconnect");
                        break;
                    }
                }
            }
        }

        self.drain();
        stream.unmount().await;
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }

    fn summary(&self) -> Option<String> {
        Some(self.counts())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(config_type_from_args(&parse_args()));
    let config = DashboardConfig::load_or_default(&config_path)?;

    init_tracing(&config.log_level);
    config.log();

    LivestreamTail::new(&config).execute().await
}
