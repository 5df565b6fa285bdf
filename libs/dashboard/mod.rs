//! # dashboard
//!
//! Terminal dashboard over the trade review API.
//!
//! Three independent views, each owning its own refresh task and state:
//!
//! - **StreamViewer**: server-sent events livestream, bounded arrival-ordered buffer
//! - **SnapshotTable**: latest row per table, polled, ranked by `Rvol`
//! - **PendingOrdersTable**: one-shot fetch of open orders
//!
//! Rendering is a pure projection of view state into [`domain::TableView`].

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::views::{
    MountedStream, PendingOrdersState, PendingOrdersTable, SnapshotState, SnapshotTable,
    StreamState, StreamViewer, ViewTask,
};
pub use domain::{PendingOrder, SnapshotRow, StreamEvent, TableRow, TableView};
pub use infrastructure::{ApiClient, ApiError, ConfigError, DashboardConfig};
