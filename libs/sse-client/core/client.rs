use crate::builder::SseClientBuilder;
use crate::config::ClientConfig;
use crate::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::decoder::SseDecoder;
use crate::traits::*;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const EVENT_STREAM_MIME: &str = "text/event-stream";
const LAST_EVENT_ID_HEADER: &str = "Last-Event-ID";

/// Lifecycle events kept for [`SseClient::try_recv_event`]; newer ones are
/// dropped while the queue is full
pub const LIFECYCLE_QUEUE_CAPACITY: usize = 64;

/// Lifecycle notifications emitted by the client task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Stream opened
    Connected,
    /// Stream dropped
    Disconnected,
    /// Reconnecting (attempt number)
    Reconnecting(usize),
    /// Error occurred
    Error(String),
}

/// Client metrics snapshot
#[derive(Debug, Clone)]
pub struct Metrics {
    pub events_received: u64,
    pub reconnect_count: u64,
    pub connection_state: ConnectionState,
}

/// Server-sent events client
///
/// Owns one spawned task that holds the HTTP stream open, decodes events and
/// passes them to the configured [`EventHandler`]. Dropping the client closes
/// the stream.
pub struct SseClient {
    /// Atomic connection state
    state: Arc<AtomicConnectionState>,
    /// Atomic metrics
    metrics: Arc<AtomicMetrics>,
    /// Lifecycle event receiver
    event_rx: Receiver<ClientEvent>,
    /// Stream task handle
    task_handle: Option<tokio::task::JoinHandle<()>>,
    /// true = keep running, false = shutdown requested
    shutdown_flag: Arc<AtomicBool>,
}

impl SseClient {
    /// Start building a client for `url`
    pub fn builder(url: impl Into<String>) -> SseClientBuilder {
        SseClientBuilder::new(url)
    }

    pub(crate) fn spawn(
        http: reqwest::Client,
        config: ClientConfig,
        handler: Box<dyn EventHandler>,
    ) -> Self {
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected));
        let metrics = Arc::new(AtomicMetrics::new());
        let shutdown_flag = Arc::clone(&config.shutdown_flag);
        let (event_tx, event_rx) = bounded(LIFECYCLE_QUEUE_CAPACITY);

        let task_handle = {
            let state = Arc::clone(&state);
            let metrics = Arc::clone(&metrics);

            tokio::spawn(async move {
                run_client(http, config, handler, state, metrics, event_tx).await;
            })
        };

        Self {
            state,
            metrics,
            event_rx,
            task_handle: Some(task_handle),
            shutdown_flag,
        }
    }

    /// Get current connection state
    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Check if connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Shared handle on the connection state, for readers that outlive a borrow
    pub fn state_handle(&self) -> Arc<AtomicConnectionState> {
        Arc::clone(&self.state)
    }

    /// Get current metrics
    pub fn metrics(&self) -> Metrics {
        Metrics {
            events_received: self.metrics.events_received(),
            reconnect_count: self.metrics.reconnect_count(),
            connection_state: self.state.get(),
        }
    }

    /// Try to receive a lifecycle event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Check whether the client task has exited
    pub fn is_finished(&self) -> bool {
        self.task_handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Close the stream and wait for the client task to exit
    pub async fn shutdown(mut self) {
        info!("Shutting down SSE client");
        self.shutdown_flag.store(false, Ordering::Release);
        self.state.set(ConnectionState::ShuttingDown);

        if let Some(handle) = self.task_handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for SseClient {
    fn drop(&mut self) {
        self.shutdown_flag.store(false, Ordering::Release);
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

/// Main client task loop
async fn run_client(
    http: reqwest::Client,
    mut config: ClientConfig,
    mut handler: Box<dyn EventHandler>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    event_tx: Sender<ClientEvent>,
) {
    let mut decoder = SseDecoder::new();
    let mut reconnect_attempt = 0;
    let shutdown_flag = Arc::clone(&config.shutdown_flag);

    loop {
        if !shutdown_flag.load(Ordering::Acquire) {
            debug!("Shutdown flag is false, exiting main loop");
            break;
        }

        state.set(if reconnect_attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting
        });

        if reconnect_attempt > 0 {
            emit(&event_tx, ClientEvent::Reconnecting(reconnect_attempt));
        }

        match open_stream(&http, &config, decoder.last_event_id()).await {
            Ok(response) => {
                info!("Connected to {}", config.url);
                state.set(ConnectionState::Connected);
                emit(&event_tx, ClientEvent::Connected);

                reconnect_attempt = 0;
                config.reconnect_strategy.reset();

                if let Err(e) = handler.handle_connection_change(true).await {
                    warn!("Handler rejected connect notification: {}", e);
                }

                if let Err(e) =
                    consume_stream(response, &mut decoder, handler.as_mut(), &metrics, &shutdown_flag)
                        .await
                {
                    error!("Stream error: {}", e);
                    emit(&event_tx, ClientEvent::Error(e.to_string()));
                }

                decoder.reset();
                state.set(ConnectionState::Disconnected);
                emit(&event_tx, ClientEvent::Disconnected);

                if let Err(e) = handler.handle_connection_change(false).await {
                    warn!("Handler rejected disconnect notification: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to connect: {}", e);
                emit(&event_tx, ClientEvent::Error(e.to_string()));
                state.set(ConnectionState::Disconnected);
            }
        }

        if !shutdown_flag.load(Ordering::Acquire) {
            debug!("Shutdown flag set during connection, stopping reconnection");
            break;
        }

        match config.reconnect_strategy.next_delay(reconnect_attempt) {
            Some(delay) => {
                // The server's retry hint is a floor, never a ceiling
                let delay = decoder.retry().map_or(delay, |hint| delay.max(hint));
                info!(
                    "Reconnecting in {:?} (attempt {})",
                    delay,
                    reconnect_attempt + 1
                );

                if !interruptible_sleep(delay, &shutdown_flag).await {
                    debug!("Shutdown flag set during reconnection delay");
                    break;
                }

                reconnect_attempt += 1;
                metrics.increment_reconnects();
            }
            None => {
                warn!("Reconnection strategy exhausted, stopping");
                break;
            }
        }
    }

    if !state.is_shutting_down() {
        state.set(ConnectionState::Disconnected);
    }
    info!("Client task exiting");
}

/// Queue a lifecycle event without ever blocking the client task
fn emit(event_tx: &Sender<ClientEvent>, event: ClientEvent) {
    if let Err(TrySendError::Full(event)) = event_tx.try_send(event) {
        debug!("Lifecycle queue full, dropping {:?}", event);
    }
}

/// Issue the stream request and validate the response head
async fn open_stream(
    http: &reqwest::Client,
    config: &ClientConfig,
    last_event_id: Option<&str>,
) -> Result<reqwest::Response> {
    let mut request = http
        .get(&config.url)
        .header(ACCEPT, EVENT_STREAM_MIME)
        .header(CACHE_CONTROL, "no-cache");

    if let Some(id) = last_event_id {
        debug!("Resuming stream from event id {}", id);
        request = request.header(LAST_EVENT_ID_HEADER, id);
    }

    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SseError::Status(status));
    }

    if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
        let content_type = content_type.to_str().unwrap_or_default();
        if !content_type.starts_with(EVENT_STREAM_MIME) {
            return Err(SseError::ContentType(content_type.to_string()));
        }
    }

    Ok(response)
}

/// Read the body until it ends, dispatching each decoded event in order
async fn consume_stream(
    response: reqwest::Response,
    decoder: &mut SseDecoder,
    handler: &mut dyn EventHandler,
    metrics: &AtomicMetrics,
    shutdown_flag: &AtomicBool,
) -> Result<()> {
    let mut body = response.bytes_stream();

    loop {
        if !shutdown_flag.load(Ordering::Acquire) {
            debug!("Shutdown flag detected in read loop, closing stream");
            return Ok(());
        }

        match body.next().await {
            Some(Ok(chunk)) => {
                for event in decoder.feed(&chunk) {
                    metrics.increment_received();
                    if let Err(e) = handler.handle_event(&event).await {
                        warn!("Handler error: {}", e);
                    }
                }
            }
            Some(Err(e)) => return Err(SseError::Request(e)),
            None => return Err(SseError::ConnectionClosed("Stream ended".into())),
        }
    }
}

/// Sleep in short slices so a shutdown request is noticed quickly.
///
/// Returns false if shutdown was requested before the delay elapsed.
async fn interruptible_sleep(delay: Duration, shutdown_flag: &AtomicBool) -> bool {
    let check_interval = Duration::from_millis(100);
    let mut elapsed = Duration::ZERO;

    while elapsed < delay {
        if !shutdown_flag.load(Ordering::Acquire) {
            return false;
        }
        let slice = std::cmp::min(check_interval, delay - elapsed);
        tokio::time::sleep(slice).await;
        elapsed += slice;
    }

    shutdown_flag.load(Ordering::Acquire)
}
