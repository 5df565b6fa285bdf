//! Record shapes consumed from the trade review API
//!
//! Rows are validated one element at a time: a malformed element is
//! quarantined (reported back with its index and reason) instead of failing
//! the whole response.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

/// Literal prefix some producers leave inside the SSE data field
pub const STREAM_DATA_PREFIX: &str = "data: ";

// =============================================================================
// StreamEvent
// =============================================================================

/// One payload received on the livestream, with local arrival metadata
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEvent {
    /// Arrival sequence number, starting at 1 per mounted viewer
    pub seq: u64,
    pub received_at: DateTime<Utc>,
    /// Arbitrary JSON, no schema enforced
    pub payload: Value,
}

impl StreamEvent {
    /// Pretty-printed payload, two-space indented
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string())
    }
}

/// Parse raw event data, stripping a leading `data: ` if present
pub fn parse_stream_payload(raw: &str) -> serde_json::Result<Value> {
    let trimmed = raw.trim_start();
    let body = trimmed.strip_prefix(STREAM_DATA_PREFIX).unwrap_or(trimmed);
    serde_json::from_str(body)
}

// =============================================================================
// SnapshotRow
// =============================================================================

/// Latest row of one livestream table
///
/// Every field is optional on the wire; absent fields render as a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(rename = "Symbol", default)]
    pub symbol: Option<String>,

    #[serde(rename = "Time", default)]
    pub time: Option<String>,

    /// Relative ATR
    #[serde(rename = "Relatr", default)]
    pub relatr: Option<f64>,

    /// Relative volume, the ranking key
    #[serde(rename = "Rvol", default)]
    pub rvol: Option<f64>,

    #[serde(rename = "TableName", default)]
    pub table_name: Option<String>,

    #[serde(rename = "Date", default)]
    pub date: Option<String>,

    #[serde(rename = "Open", default)]
    pub open: Option<f64>,

    #[serde(rename = "High", default)]
    pub high: Option<f64>,

    #[serde(rename = "Low", default)]
    pub low: Option<f64>,

    #[serde(rename = "Close", default)]
    pub close: Option<f64>,

    #[serde(rename = "Volume", default)]
    pub volume: Option<f64>,

    #[serde(rename = "VWAP", default)]
    pub vwap: Option<f64>,

    #[serde(rename = "EMA9", default)]
    pub ema9: Option<f64>,

    #[serde(rename = "Avg_volume", default)]
    pub avg_volume: Option<f64>,
}

/// Order rows by `Rvol` descending.
///
/// Stable: equal keys keep response order. Rows without `Rvol` go last.
pub fn sort_by_rvol_desc(rows: &mut [SnapshotRow]) {
    rows.sort_by(|a, b| match (a.rvol, b.rvol) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

// =============================================================================
// PendingOrder
// =============================================================================

/// An open order awaiting its stop, enriched with the latest ask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Broker order id (text) or auto-order id (integer), kept as text
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    pub symbol: String,

    pub latest_price: f64,

    pub stop_price: f64,

    /// Shares to buy for the configured risk
    pub position_size: f64,

    /// Order size, not sent by every backend version
    #[serde(default)]
    pub size: Option<f64>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Int(i64),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Int(n) => n.to_string(),
    })
}

// =============================================================================
// Boundary validation
// =============================================================================

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("expected a JSON array, got {0}")]
    NotAnArray(&'static str),
}

/// An element dropped at the API boundary
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Position in the response array
    pub index: usize,
    pub reason: String,
}

/// Result of validating one array response
#[derive(Debug, Clone)]
pub struct RowBatch<T> {
    pub rows: Vec<T>,
    pub rejected: Vec<RejectedRow>,
}

impl<T> RowBatch<T> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Validate an array response element by element.
///
/// Falsy elements (`null`, `false`, `0`, `""`) are skipped silently; any other
/// element that does not match `T` is quarantined.
pub fn parse_rows<T: DeserializeOwned>(body: Value) -> Result<RowBatch<T>, SchemaError> {
    let items = match body {
        Value::Array(items) => items,
        other => return Err(SchemaError::NotAnArray(json_kind(&other))),
    };

    let mut batch = RowBatch::empty();
    for (index, item) in items.into_iter().enumerate() {
        if is_falsy(&item) {
            continue;
        }
        match serde_json::from_value::<T>(item) {
            Ok(row) => batch.rows.push(row),
            Err(e) => batch.rejected.push(RejectedRow {
                index,
                reason: e.to_string(),
            }),
        }
    }
    Ok(batch)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
