//! Ranked snapshot table
//!
//! Polls the latest row of every livestream table on a fixed interval and
//! shows them ranked by relative volume. A failed cycle keeps the previous
//! rows on screen next to the error.

use super::ViewTask;
use crate::domain::{cell, sort_by_rvol_desc, RowBatch, SnapshotRow, TableRow, TableView};
use crate::infrastructure::client::{ApiClient, ApiError};
use crate::infrastructure::config::SnapshotConfig;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub const SNAPSHOT_CAPTION: &str = "Last rows of all tables (sorted by Rvol ↓)";
pub const SNAPSHOT_HEADERS: [&str; 4] = ["Symbol", "Time", "Relatr", "Rvol"];

#[derive(Debug, Default)]
pub struct SnapshotState {
    rows: Vec<SnapshotRow>,
    error: Option<String>,
    /// Elements dropped from the last successful response
    quarantined: usize,
    last_success: Option<DateTime<Utc>>,
}

pub type SharedSnapshotState = Arc<RwLock<SnapshotState>>;

impl SnapshotState {
    /// Apply one poll cycle.
    ///
    /// Success replaces the rows wholesale and clears the error; failure only
    /// sets the error.
    pub fn apply(&mut self, result: Result<RowBatch<SnapshotRow>, ApiError>) {
        match result {
            Ok(batch) => {
                for rejected in &batch.rejected {
                    warn!(
                        "[SnapshotTable] Dropped row {}: {}",
                        rejected.index, rejected.reason
                    );
                }
                let mut rows = batch.rows;
                sort_by_rvol_desc(&mut rows);

                self.rows = rows;
                self.quarantined = batch.rejected.len();
                self.error = None;
                self.last_success = Some(Utc::now());
            }
            Err(e) => {
                error!("[SnapshotTable] Fetch failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Rows in display order (Rvol descending)
    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn quarantined(&self) -> usize {
        self.quarantined
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    pub fn table_view(&self) -> TableView {
        let mut view = TableView::new(&SNAPSHOT_HEADERS);
        view.caption = Some(SNAPSHOT_CAPTION.to_string());
        view.error = self.error.as_ref().map(|e| format!("Error: {}", e));
        view.rows = self
            .rows
            .iter()
            .map(|row| {
                TableRow::Cells(vec![
                    cell(row.symbol.as_deref()),
                    cell(row.time.as_deref()),
                    cell(row.relatr),
                    cell(row.rvol),
                ])
            })
            .collect();
        view
    }
}

/// Snapshot table component. Clones share state.
#[derive(Clone)]
pub struct SnapshotTable {
    client: ApiClient,
    path: String,
    interval: Duration,
    state: SharedSnapshotState,
    refresh_now: Arc<Notify>,
}

impl SnapshotTable {
    pub fn new(client: ApiClient, config: &SnapshotConfig) -> Self {
        Self {
            client,
            path: config.path.clone(),
            interval: config.poll_interval(),
            state: Arc::new(RwLock::new(SnapshotState::default())),
            refresh_now: Arc::new(Notify::new()),
        }
    }

    pub fn state(&self) -> SharedSnapshotState {
        Arc::clone(&self.state)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one poll cycle
    pub async fn refresh(&self) {
        let result = self.client.get_rows::<SnapshotRow>(&self.path).await;
        if let Ok(batch) = &result {
            debug!("[SnapshotTable] Received {} rows", batch.rows.len());
        }
        self.state.write().apply(result);
    }

    /// Ask the mounted poll loop to run a cycle now
    pub fn trigger_refresh(&self) {
        self.refresh_now.notify_one();
    }

    /// Start polling: one cycle immediately, then every interval
    pub fn mount(&self) -> ViewTask {
        info!(
            "[SnapshotTable] Polling {} every {:?}",
            self.client.url(&self.path),
            self.interval
        );

        let table = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(table.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = table.refresh_now.notified() => {
                        debug!("[SnapshotTable] Manual refresh");
                        ticker.reset();
                    }
                }
                table.refresh().await;
            }
        });

        ViewTask::new("SnapshotTable", handle)
    }
}
