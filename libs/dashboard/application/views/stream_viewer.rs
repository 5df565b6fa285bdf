//! Livestream viewer
//!
//! Holds one server-sent events subscription and appends every valid JSON
//! `message` payload to a bounded, arrival-ordered buffer. Named events are
//! ignored.

use crate::domain::{parse_stream_payload, StreamEvent};
use crate::infrastructure::client::api::join_url;
use crate::infrastructure::config::{ApiConfig, ReconnectConfig, StreamConfig};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use sse_client::{ConnectionState, EventHandler, ExponentialBackoff, Metrics, SseClient, SseEvent};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Longest payload excerpt quoted in a parse error log line
const LOG_PREVIEW_CHARS: usize = 120;

// =============================================================================
// State
// =============================================================================

/// Arrival-ordered ring of stream events
#[derive(Debug)]
pub struct StreamState {
    events: VecDeque<StreamEvent>,
    capacity: usize,
    next_seq: u64,
    rejected: u64,
    evicted: u64,
    connected: bool,
}

pub type SharedStreamState = Arc<RwLock<StreamState>>;

impl StreamState {
    /// `capacity` is clamped to at least one event
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_seq: 1,
            rejected: 0,
            evicted: 0,
            connected: false,
        }
    }

    /// Parse raw event data and append it.
    ///
    /// On a parse error the buffer is left untouched and the rejected count
    /// goes up. Returns the new event's sequence number.
    pub fn ingest(&mut self, raw: &str) -> serde_json::Result<u64> {
        match parse_stream_payload(raw) {
            Ok(payload) => Ok(self.push(payload)),
            Err(e) => {
                self.rejected += 1;
                Err(e)
            }
        }
    }

    /// Append an already parsed payload, evicting the oldest event when full
    pub fn push(&mut self, payload: Value) -> u64 {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push_back(StreamEvent {
            seq,
            received_at: Utc::now(),
            payload,
        });
        seq
    }

    pub fn events(&self) -> impl DoubleEndedIterator<Item = &StreamEvent> + ExactSizeIterator {
        self.events.iter()
    }

    /// Events with a sequence number greater than `seq`, oldest first
    pub fn events_since(&self, seq: u64) -> Vec<StreamEvent> {
        self.events
            .iter()
            .filter(|event| event.seq > seq)
            .cloned()
            .collect()
    }

    pub fn latest(&self) -> Option<&StreamEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Valid events accepted since mount, evicted ones included
    pub fn accepted_count(&self) -> u64 {
        self.next_seq - 1
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    pub fn evicted_count(&self) -> u64 {
        self.evicted
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Feeds decoded events into the shared state
struct StreamStateHandler {
    state: SharedStreamState,
}

#[async_trait]
impl EventHandler for StreamStateHandler {
    async fn handle_event(&mut self, event: &SseEvent) -> sse_client::Result<()> {
        if !event.is_message() {
            debug!("[StreamViewer] Ignoring '{}' event", event.event);
            return Ok(());
        }

        let result = self.state.write().ingest(&event.data);
        match result {
            Ok(seq) => debug!("[StreamViewer] Event #{}", seq),
            Err(e) => error!(
                "[StreamViewer] Failed to parse stream payload: {} (data: {})",
                e,
                preview(&event.data)
            ),
        }
        Ok(())
    }

    async fn handle_connection_change(&mut self, connected: bool) -> sse_client::Result<()> {
        self.state.write().set_connected(connected);
        if connected {
            info!("[StreamViewer] Subscription open");
        } else {
            warn!("[StreamViewer] Subscription dropped");
        }
        Ok(())
    }
}

fn preview(data: &str) -> String {
    if data.chars().count() <= LOG_PREVIEW_CHARS {
        return data.to_string();
    }
    let head: String = data.chars().take(LOG_PREVIEW_CHARS).collect();
    format!("{}...", head)
}

// =============================================================================
// View
// =============================================================================

/// Stream viewer component
pub struct StreamViewer {
    url: String,
    config: StreamConfig,
    connect_timeout: Duration,
    state: SharedStreamState,
}

impl StreamViewer {
    pub fn new(api: &ApiConfig, config: &StreamConfig) -> Self {
        Self {
            url: join_url(&api.base_url, &config.path),
            config: config.clone(),
            connect_timeout: api.connect_timeout(),
            state: Arc::new(RwLock::new(StreamState::new(config.max_events))),
        }
    }

    /// Stream endpoint this viewer subscribes to
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> SharedStreamState {
        Arc::clone(&self.state)
    }

    /// Open the subscription.
    ///
    /// Events from any previous mount are discarded.
    pub async fn mount(&self) -> sse_client::Result<MountedStream> {
        *self.state.write() = StreamState::new(self.config.max_events);
        info!("[StreamViewer] Subscribing to {}", self.url);

        let builder = SseClient::builder(&self.url)
            .with_credentials(self.config.with_credentials)
            .connect_timeout(self.connect_timeout)
            .handler(StreamStateHandler {
                state: self.state(),
            });

        let builder = match reconnect_strategy(&self.config.reconnect) {
            Some(strategy) => builder.reconnect_strategy(strategy),
            None => builder,
        };

        Ok(MountedStream {
            client: builder.build().await?,
            state: self.state(),
        })
    }
}

/// Backoff for the stream subscription, `None` when reconnecting is disabled
pub fn reconnect_strategy(config: &ReconnectConfig) -> Option<ExponentialBackoff> {
    if !config.enabled {
        return None;
    }
    Some(
        ExponentialBackoff::new(
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
            config.max_attempts,
        )
        .with_jitter(config.jitter),
    )
}

/// A live subscription. Dropping it closes the stream.
pub struct MountedStream {
    client: SseClient,
    state: SharedStreamState,
}

impl MountedStream {
    pub fn connection_state(&self) -> ConnectionState {
        self.client.connection_state()
    }

    pub fn metrics(&self) -> Metrics {
        self.client.metrics()
    }

    /// The subscription task has stopped (reconnects exhausted or disabled)
    pub fn is_finished(&self) -> bool {
        self.client.is_finished()
    }

    /// Close the subscription and wait for its task to stop
    pub async fn unmount(self) {
        self.client.shutdown().await;
        self.state.write().set_connected(false);
        info!("[StreamViewer] Unmounted");
    }
}
