//! View components
//!
//! Each view owns its state behind `Arc<RwLock<_>>` and, once mounted, one
//! background task that is its sole writer. Renderers only take read locks.

pub mod pending_orders;
pub mod snapshot_table;
pub mod stream_viewer;

use tokio::task::JoinHandle;
use tracing::debug;

pub use pending_orders::{
    PendingOrdersState, PendingOrdersTable, SharedPendingOrdersState, EMPTY_ORDERS_TEXT,
    PENDING_ORDERS_HEADERS,
};
pub use snapshot_table::{
    SharedSnapshotState, SnapshotState, SnapshotTable, SNAPSHOT_CAPTION, SNAPSHOT_HEADERS,
};
pub use stream_viewer::{MountedStream, SharedStreamState, StreamState, StreamViewer};

/// Handle on a mounted view's background task.
///
/// Dropping it unmounts the view: the task is aborted, and any request it had
/// in flight is dropped with it.
#[derive(Debug)]
pub struct ViewTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl ViewTask {
    pub(crate) fn new(name: &'static str, handle: JoinHandle<()>) -> Self {
        Self {
            name,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Abort the task and wait for it to stop
    pub async fn unmount(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            debug!("[{}] Unmounted", self.name);
        }
    }
}

impl Drop for ViewTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
