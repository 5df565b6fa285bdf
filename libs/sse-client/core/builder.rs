use crate::client::SseClient;
use crate::config::ClientConfig;
use crate::traits::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`SseClient`]
///
/// # Example
/// ```ignore
/// let client = SseClient::builder("http://127.0.0.1:8000/api/livestream/stream")
///     .with_credentials(true)
///     .reconnect_strategy(
///         ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(30), None)
///             .with_jitter(0.3),
///     )
///     .handler(MyHandler::new())
///     .build()
///     .await?;
/// ```
pub struct SseClientBuilder {
    url: String,
    with_credentials: bool,
    connect_timeout: Duration,
    reconnect_strategy: Box<dyn ReconnectionStrategy>,
    handler: Box<dyn EventHandler>,
}

impl SseClientBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            with_credentials: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reconnect_strategy: Box::new(NeverReconnect),
            handler: Box::new(NoOpHandler),
        }
    }

    /// Enable the cookie store so the stream carries credentials
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the reconnection strategy (default: [`NeverReconnect`])
    pub fn reconnect_strategy(mut self, strategy: impl ReconnectionStrategy + 'static) -> Self {
        self.reconnect_strategy = Box::new(strategy);
        self
    }

    /// Set the event handler (default: [`NoOpHandler`])
    pub fn handler(mut self, handler: impl EventHandler) -> Self {
        self.handler = Box::new(handler);
        self
    }

    /// Validate the configuration and spawn the client task.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<SseClient> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(SseError::Configuration(format!(
                "stream URL must be http(s): {}",
                self.url
            )));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .cookie_store(self.with_credentials)
            .tcp_keepalive(Duration::from_secs(15))
            .build()?;

        let config = ClientConfig {
            url: self.url,
            reconnect_strategy: self.reconnect_strategy,
            // true = keep running, false = shutdown requested
            shutdown_flag: Arc::new(AtomicBool::new(true)),
        };

        Ok(SseClient::spawn(http, config, self.handler))
    }
}
