//! Client core: builder, connection task, wire decoder and status atomics.

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;
pub mod decoder;

// Re-export main types
pub use builder::SseClientBuilder;
pub use client::{ClientEvent, Metrics, SseClient, LIFECYCLE_QUEUE_CAPACITY};
pub use config::ClientConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
pub use decoder::SseDecoder;

// Re-export traits for convenience
pub use crate::traits::*;
