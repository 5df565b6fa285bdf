//! # sse-client traits
//!
//! Core traits and types shared by the client:
//!
//! - **SseEvent**: one dispatched server-sent event
//! - **EventHandler**: consume events and connection changes
//! - **ReconnectionStrategy**: control reconnection behavior
//!
//! ## Example
//!
//! ```rust,ignore
//! use sse_client::*;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl EventHandler for Printer {
//!     async fn handle_event(&mut self, event: &SseEvent) -> Result<()> {
//!         println!("{}: {}", event.event, event.data);
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod event;
pub mod handler;
pub mod reconnect;

// Re-export commonly used types
pub use async_trait::async_trait;
pub use error::{Result, SseError};
pub use event::{SseEvent, DEFAULT_EVENT_TYPE};
pub use handler::{EventHandler, NoOpHandler};
pub use reconnect::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy};
