//! Pending orders table
//!
//! One-shot fetch on mount. Any failure empties the table.

use super::ViewTask;
use crate::domain::{cell, PendingOrder, RowBatch, TableRow, TableView};
use crate::infrastructure::client::{ApiClient, ApiError};
use crate::infrastructure::config::PendingOrdersConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const PENDING_ORDERS_HEADERS: [&str; 6] = [
    "Id",
    "Symbol",
    "Latest Price",
    "Stop Price",
    "Quantity",
    "Size",
];

pub const EMPTY_ORDERS_TEXT: &str = "No orders found.";

#[derive(Debug, Default)]
pub struct PendingOrdersState {
    orders: Vec<PendingOrder>,
    quarantined: usize,
}

pub type SharedPendingOrdersState = Arc<RwLock<PendingOrdersState>>;

impl PendingOrdersState {
    pub fn apply(&mut self, result: Result<RowBatch<PendingOrder>, ApiError>) {
        match result {
            Ok(batch) => {
                for rejected in &batch.rejected {
                    warn!(
                        "[PendingOrders] Dropped order {}: {}",
                        rejected.index, rejected.reason
                    );
                }
                info!("[PendingOrders] Loaded {} orders", batch.rows.len());
                self.quarantined = batch.rejected.len();
                self.orders = batch.rows;
            }
            Err(e) => {
                error!("[PendingOrders] Failed to fetch orders: {}", e);
                self.orders.clear();
                self.quarantined = 0;
            }
        }
    }

    pub fn orders(&self) -> &[PendingOrder] {
        &self.orders
    }

    pub fn quarantined(&self) -> usize {
        self.quarantined
    }

    pub fn table_view(&self) -> TableView {
        let mut view = TableView::new(&PENDING_ORDERS_HEADERS);

        if self.orders.is_empty() {
            view.rows.push(TableRow::Spanning {
                text: EMPTY_ORDERS_TEXT.to_string(),
                span: PENDING_ORDERS_HEADERS.len(),
            });
            return view;
        }

        view.rows = self
            .orders
            .iter()
            .map(|order| {
                TableRow::Cells(vec![
                    order.id.clone(),
                    order.symbol.clone(),
                    order.latest_price.to_string(),
                    order.stop_price.to_string(),
                    order.position_size.to_string(),
                    cell(order.size),
                ])
            })
            .collect();
        view
    }
}

/// Pending orders component. Clones share state.
#[derive(Clone)]
pub struct PendingOrdersTable {
    client: ApiClient,
    path: String,
    state: SharedPendingOrdersState,
}

impl PendingOrdersTable {
    pub fn new(client: ApiClient, config: &PendingOrdersConfig) -> Self {
        Self {
            client,
            path: config.path.clone(),
            state: Arc::new(RwLock::new(PendingOrdersState::default())),
        }
    }

    pub fn state(&self) -> SharedPendingOrdersState {
        Arc::clone(&self.state)
    }

    /// Fetch once and replace local state
    pub async fn load(&self) {
        let result = self.client.get_rows::<PendingOrder>(&self.path).await;
        self.state.write().apply(result);
    }

    /// Run the one-shot fetch in the background
    pub fn mount(&self) -> ViewTask {
        info!("[PendingOrders] Loading {}", self.client.url(&self.path));
        let table = self.clone();
        let handle = tokio::spawn(async move {
            table.load().await;
        });
        ViewTask::new("PendingOrders", handle)
    }
}
