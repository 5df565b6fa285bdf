//! Main application state and logic for the dashboard

use anyhow::Result;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::application::views::{
    MountedStream, PendingOrdersTable, SharedPendingOrdersState, SharedSnapshotState,
    SharedStreamState, SnapshotTable, StreamViewer, ViewTask,
};
use crate::infrastructure::{ApiClient, DashboardConfig};
use sse_client::ConnectionState;

/// Main application state
pub struct App {
    /// Livestream subscription (None once shut down)
    stream: Option<MountedStream>,
    pub stream_state: SharedStreamState,
    pub stream_url: String,
    snapshot: SnapshotTable,
    pub snapshot_state: SharedSnapshotState,
    /// Poll loop; dropping it stops polling
    _snapshot_task: ViewTask,
    pending_orders: PendingOrdersTable,
    pub pending_orders_state: SharedPendingOrdersState,
    orders_task: Option<ViewTask>,
    /// Events hidden below the viewport (0 = follow newest)
    pub event_offset: usize,
    /// Whether to quit
    pub should_quit: bool,
    /// Tokio runtime handle
    runtime: Handle,
    /// Status message to show in footer
    pub status_message: Option<String>,
}

impl App {
    /// Mount all three views
    pub async fn initialize(runtime: Handle, config: &DashboardConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api);
        info!("[Dashboard] API base {}", client.base_url());

        let viewer = StreamViewer::new(&config.api, &config.stream);
        let stream_state = viewer.state();
        let stream_url = viewer.url().to_string();
        let stream = viewer.mount().await?;

        let snapshot = SnapshotTable::new(client.clone(), &config.snapshot);
        let snapshot_state = snapshot.state();
        let snapshot_task = snapshot.mount();

        let pending_orders = PendingOrdersTable::new(client, &config.pending_orders);
        let pending_orders_state = pending_orders.state();
        let orders_task = pending_orders.mount();

        Ok(Self {
            stream: Some(stream),
            stream_state,
            stream_url,
            snapshot,
            snapshot_state,
            _snapshot_task: snapshot_task,
            pending_orders,
            pending_orders_state,
            orders_task: Some(orders_task),
            event_offset: 0,
            should_quit: false,
            runtime,
            status_message: None,
        })
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.stream
            .as_ref()
            .map_or(ConnectionState::ShuttingDown, |s| s.connection_state())
    }

    /// Run a snapshot cycle now instead of waiting for the timer
    pub fn refresh_snapshot(&mut self) {
        self.snapshot.trigger_refresh();
        self.status_message = Some("Refreshing snapshot...".to_string());
    }

    /// Remount the pending orders view, which fetches again
    pub fn reload_orders(&mut self) {
        let _guard = self.runtime.enter();
        // Replacing the task aborts a fetch still in flight
        self.orders_task = Some(self.pending_orders.mount());
        self.status_message = Some("Reloading pending orders...".to_string());
    }

    fn buffered_events(&self) -> usize {
        self.stream_state.read().len()
    }

    /// Scroll towards newer events
    pub fn scroll_down(&mut self) {
        self.event_offset = self.event_offset.saturating_sub(1);
    }

    /// Scroll towards older events
    pub fn scroll_up(&mut self) {
        let len = self.buffered_events();
        if self.event_offset + 1 < len {
            self.event_offset += 1;
        }
    }

    pub fn scroll_top(&mut self) {
        self.event_offset = self.buffered_events().saturating_sub(1);
    }

    pub fn scroll_bottom(&mut self) {
        self.event_offset = 0;
    }

    /// Counts shown in the header
    pub fn stream_summary(&self) -> String {
        let state = self.stream_state.read();
        format!(
            "Events: {} (buffered {}/{}) | Rejected: {} | Evicted: {}",
            state.accepted_count(),
            state.len(),
            state.capacity(),
            state.rejected_count(),
            state.evicted_count()
        )
    }

    /// Time of the last good snapshot, for the footer
    pub fn snapshot_summary(&self) -> String {
        match self.snapshot_state.read().last_success() {
            Some(at) => format!("Snapshot {}", at.format("%H:%M:%S")),
            None => "Snapshot pending".to_string(),
        }
    }

    /// Close the stream and stop every view task
    pub fn shutdown(&mut self) {
        info!("[Dashboard] Shutting down");
        self.orders_task = None;
        if let Some(stream) = self.stream.take() {
            self.runtime.block_on(stream.unmount());
        } else {
            warn!("[Dashboard] Shutdown called twice");
        }
    }
}
