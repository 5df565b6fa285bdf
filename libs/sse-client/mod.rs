//! # sse-client
//!
//! A reconnecting server-sent events (`text/event-stream`) client.
//!
//! ## Features
//!
//! - **WHATWG event-stream framing**: `data`/`event`/`id`/`retry` fields, comments,
//!   any of `\n`, `\r\n` or `\r` as line terminator
//! - **Pluggable reconnection**: exponential backoff with jitter, fixed delay, or never
//! - **Resumable**: resends the last seen event id as `Last-Event-ID`
//! - **Handler driven**: each decoded event is passed to an [`EventHandler`]
//!   on the client task, in arrival order
//! - **Lock-free status**: connection state and counters are atomics

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use core::{
    builder, client, config, connection_state, decoder,
    builder::SseClientBuilder,
    client::{ClientEvent, Metrics, SseClient, LIFECYCLE_QUEUE_CAPACITY},
    config::ClientConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
    decoder::SseDecoder,
};
