//! Domain Layer
//!
//! Record shapes for the three API surfaces and the table projection
//! shared by all views. No I/O.

pub mod models;
pub mod table;

pub use models::{
    parse_rows, parse_stream_payload, sort_by_rvol_desc, PendingOrder, RejectedRow, RowBatch,
    SchemaError, SnapshotRow, StreamEvent,
};
pub use table::{cell, TableRow, TableView, PLACEHOLDER};
