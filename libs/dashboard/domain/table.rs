//! Renderer-independent table projection
//!
//! Views project their state into a [`TableView`]; the terminal UI (or a
//! test) only ever looks at this shape.

use std::fmt::Display;

/// Cell text for a missing field
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Cells(Vec<String>),
    /// One cell spanning `span` columns (empty state)
    Spanning { text: String, span: usize },
}

impl TableRow {
    pub fn cells(&self) -> Option<&[String]> {
        match self {
            TableRow::Cells(cells) => Some(cells),
            TableRow::Spanning { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub caption: Option<String>,
    pub headers: Vec<&'static str>,
    pub rows: Vec<TableRow>,
    /// Error line shown above the table
    pub error: Option<String>,
}

impl TableView {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            ..Default::default()
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Values of one column, in display order (spanning rows skipped)
    pub fn column(&self, header: &str) -> Vec<&str> {
        let Some(idx) = self.headers.iter().position(|h| *h == header) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.cells())
            .filter_map(|cells| cells.get(idx).map(String::as_str))
            .collect()
    }
}

/// Display an optional value, falling back to [`PLACEHOLDER`]
pub fn cell<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}
