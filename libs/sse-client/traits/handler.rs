use crate::error::Result;
use crate::event::SseEvent;
use async_trait::async_trait;

/// Trait for consuming a server-sent event stream
///
/// The handler is owned by the client task and called sequentially,
/// so events are observed in network arrival order. Errors returned
/// from either method are logged and never terminate the subscription.
#[async_trait]
pub trait EventHandler: Send + 'static {
    /// Handle one dispatched event
    ///
    /// # Arguments
    /// * `event` - The decoded event
    ///
    /// # Returns
    /// * `Ok(())` - Event consumed
    /// * `Err(SseError)` - Event rejected (logged, stream continues)
    async fn handle_event(&mut self, event: &SseEvent) -> Result<()>;

    /// Handle connection state change
    ///
    /// # Arguments
    /// * `connected` - true once the stream is open, false after it drops
    async fn handle_connection_change(&mut self, _connected: bool) -> Result<()> {
        Ok(())
    }
}

/// A handler that drops every event
pub struct NoOpHandler;

#[async_trait]
impl EventHandler for NoOpHandler {
    async fn handle_event(&mut self, _event: &SseEvent) -> Result<()> {
        Ok(())
    }
}
