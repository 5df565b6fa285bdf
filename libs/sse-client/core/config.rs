use crate::traits::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for an SseClient
///
/// Built by [`SseClientBuilder`](crate::SseClientBuilder) and moved into
/// the client task.
pub struct ClientConfig {
    /// Stream URL (http:// or https://)
    pub(crate) url: String,

    /// Reconnection strategy
    pub(crate) reconnect_strategy: Box<dyn ReconnectionStrategy>,

    /// Shutdown flag - when false, prevents reconnection attempts
    pub(crate) shutdown_flag: Arc<AtomicBool>,
}
