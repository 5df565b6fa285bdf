/// Event type used when the stream does not name one
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// A single dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type (`event:` field), `"message"` when absent
    pub event: String,
    /// Concatenated `data:` lines joined with `\n`
    pub data: String,
    /// Last event id seen on the stream at dispatch time
    pub id: Option<String>,
}

impl SseEvent {
    /// Check if this is an unnamed (default) event
    pub fn is_message(&self) -> bool {
        self.event == DEFAULT_EVENT_TYPE
    }
}
