//! Dashboard TUI
//!
//! Composes the stream viewer, snapshot table and pending orders table on
//! one terminal screen.

pub mod app;
pub mod ui;

pub use app::App;
