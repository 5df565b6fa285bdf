//! Incremental `text/event-stream` decoder
//!
//! Bytes are fed as they arrive from the network; complete events are
//! returned once their terminating blank line has been seen. Chunk
//! boundaries may fall anywhere, including between `\r` and `\n`.

use crate::traits::{SseEvent, DEFAULT_EVENT_TYPE};
use std::time::Duration;

const BOM: char = '\u{feff}';

#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line
    line: Vec<u8>,
    /// Previous chunk ended in `\r`; a leading `\n` belongs to that terminator
    pending_cr: bool,
    /// First line of the stream not processed yet (BOM check)
    at_stream_start: bool,
    data: String,
    has_data: bool,
    event_type: String,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self {
            at_stream_start: true,
            ..Default::default()
        }
    }

    /// Feed a chunk and collect every event it completes
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();

        for &byte in chunk {
            if self.pending_cr {
                self.pending_cr = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\n' => self.end_line(&mut events),
                b'\r' => {
                    self.pending_cr = true;
                    self.end_line(&mut events);
                }
                _ => self.line.push(byte),
            }
        }

        events
    }

    /// Drop any partially received event before a new connection.
    ///
    /// The last event id and retry hint survive: both apply to the next
    /// connection.
    pub fn reset(&mut self) {
        self.line.clear();
        self.pending_cr = false;
        self.at_stream_start = true;
        self.data.clear();
        self.has_data = false;
        self.event_type.clear();
    }

    /// Last `id:` seen on the stream
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Last `retry:` hint sent by the server
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    fn end_line(&mut self, events: &mut Vec<SseEvent>) {
        let raw = std::mem::take(&mut self.line);
        let mut line = String::from_utf8_lossy(&raw).into_owned();

        if self.at_stream_start {
            self.at_stream_start = false;
            if line.starts_with(BOM) {
                line.remove(0);
            }
        }

        if let Some(event) = self.process_line(&line) {
            events.push(event);
        }
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }

        // Comment
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
                self.has_data = true;
            }
            "event" => self.event_type = value.to_string(),
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    };
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(ms) = value.parse::<u64>() {
                        self.retry = Some(Duration::from_millis(ms));
                    }
                }
            }
            _ => {}
        }

        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = std::mem::take(&mut self.event_type);

        if !self.has_data {
            return None;
        }
        self.has_data = false;

        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }

        let event_type = if event_type.is_empty() {
            DEFAULT_EVENT_TYPE.to_string()
        } else {
            event_type
        };

        Some(SseEvent {
            event: event_type,
            data,
            id: self.last_event_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(input: &str) -> Vec<SseEvent> {
        SseDecoder::new().feed(input.as_bytes())
    }

    #[test]
    fn test_single_data_event() {
        let events = decode_all("data: {\"a\":1}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"a\":1}");
        assert!(events[0].is_message());
        assert_eq!(events[0].id, None);
    }

    #[test]
    fn test_multiline_data_joined_with_newline() {
        let events = decode_all("data: first\ndata: second\n\n");
        assert_eq!(events[0].data, "first\nsecond");
    }

    #[test]
    fn test_only_one_leading_space_stripped() {
        let events = decode_all("data:  two spaces\ndata:none\n\n");
        assert_eq!(events[0].data, " two spaces\nnone");
    }

    #[test]
    fn test_crlf_and_cr_terminators() {
        let events = decode_all("data: a\r\n\r\ndata: b\r\rdata: c\n\n");
        let data: Vec<&str> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: a\r").is_empty());
        // The \n completes the \r above, not a blank line
        assert!(decoder.feed(b"\n").is_empty());
        let events = decoder.feed(b"\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "a");
    }

    #[test]
    fn test_event_split_across_many_chunks() {
        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for chunk in ["da", "ta: {\"Sym", "bol\":\"AAPL\"}", "\n", "\n"] {
            events.extend(decoder.feed(chunk.as_bytes()));
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"Symbol\":\"AAPL\"}");
    }

    #[test]
    fn test_comments_and_unknown_fields_ignored() {
        let events = decode_all(": keep-alive\nfoo: bar\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn test_event_without_data_is_not_dispatched() {
        let events = decode_all("event: ping\n\ndata: y\n\n");
        assert_eq!(events.len(), 1);
        // Event type does not leak into the next event
        assert!(events[0].is_message());
    }

    #[test]
    fn test_named_event_and_id() {
        let events = decode_all("event: candle\nid: 42\ndata: z\n\n");
        assert_eq!(events[0].event, "candle");
        assert_eq!(events[0].id.as_deref(), Some("42"));
    }

    #[test]
    fn test_id_persists_across_events() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"id: 7\ndata: a\n\ndata: b\n\n");
        assert_eq!(events[1].id.as_deref(), Some("7"));
        assert_eq!(decoder.last_event_id(), Some("7"));
    }

    #[test]
    fn test_id_with_nul_ignored() {
        let mut decoder = SseDecoder::new();
        decoder.feed(b"id: 1\n\nid: bad\0id\n\n");
        assert_eq!(decoder.last_event_id(), Some("1"));
    }

    #[test]
    fn test_retry_field() {
        let mut decoder = SseDecoder::new();
        decoder.feed(b"retry: 3000\n\nretry: soon\n\n");
        assert_eq!(decoder.retry(), Some(Duration::from_millis(3000)));
    }

    #[test]
    fn test_field_without_colon() {
        let events = decode_all("data\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "");
    }

    #[test]
    fn test_leading_bom_stripped() {
        let events = decode_all("\u{feff}data: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn test_reset_discards_partial_event_but_keeps_id() {
        let mut decoder = SseDecoder::new();
        decoder.feed(b"id: 9\ndata: done\n\ndata: partial\n");
        decoder.reset();
        let events = decoder.feed(b"\n");
        assert!(events.is_empty());
        assert_eq!(decoder.last_event_id(), Some("9"));
    }

    #[test]
    fn test_prefixed_payload_kept_verbatim() {
        // Backends that double-prefix leave "data: " inside the data field
        let events = decode_all("data: data: {\"x\":1}\n\n");
        assert_eq!(events[0].data, "data: {\"x\":1}");
    }
}
