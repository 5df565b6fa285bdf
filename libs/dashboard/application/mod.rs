//! Application Layer
//!
//! The three view components and the terminal UI that composes them.

pub mod views;
pub mod visualizer;

pub use views::{PendingOrdersTable, SnapshotTable, StreamViewer, ViewTask};
