//! Canonical cell values produced by source adapters.
//!
//! Spreadsheet adapters classify each cell into one of the [`RawCell`]
//! kinds; delimited-text sources only ever produce `Text` and `Absent`.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One source cell, classified into a closed set of scalar kinds.
///
/// Serialized externally tagged in snake case, e.g. `{"text": "Kim"}`,
/// `{"number": 32.0}` or the bare string `"absent"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawCell {
    Text(String),
    Number(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
    #[default]
    Absent,
}

/// Discriminant of a [`RawCell`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Text,
    Number,
    Boolean,
    Timestamp,
    Absent,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Text => "text",
            CellKind::Number => "number",
            CellKind::Boolean => "boolean",
            CellKind::Timestamp => "timestamp",
            CellKind::Absent => "absent",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RawCell {
    pub fn kind(&self) -> CellKind {
        match self {
            RawCell::Text(_) => CellKind::Text,
            RawCell::Number(_) => CellKind::Number,
            RawCell::Boolean(_) => CellKind::Boolean,
            RawCell::Timestamp(_) => CellKind::Timestamp,
            RawCell::Absent => CellKind::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RawCell::Absent)
    }

    /// Returns true for absent cells and text that is empty after trimming.
    ///
    /// Zero numbers, `false` and timestamps are values, never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Absent => true,
            RawCell::Text(text) => text.trim().is_empty(),
            RawCell::Number(_) | RawCell::Boolean(_) | RawCell::Timestamp(_) => false,
        }
    }

    /// The value as a text field receives it.
    ///
    /// Numbers always keep a fractional part (`5500.0`, `0.25`); other kinds
    /// render as [`Display`](fmt::Display) does.
    pub fn to_text(&self) -> String {
        match self {
            RawCell::Number(value) => format!("{value:?}"),
            other => other.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawCell::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Stringified cell value; absent cells render as the empty string.
impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Text(text) => f.write_str(text),
            RawCell::Number(value) => f.write_str(&format_number(*value)),
            RawCell::Boolean(value) => write!(f, "{value}"),
            RawCell::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
            RawCell::Absent => Ok(()),
        }
    }
}

/// Formats a floating-point number without a trailing `.0`.
///
/// `5500.0` renders as `5500`, `0.25` as `0.25`, negative zero as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<bool> for RawCell {
    fn from(value: bool) -> Self {
        RawCell::Boolean(value)
    }
}

impl From<NaiveDateTime> for RawCell {
    fn from(value: NaiveDateTime) -> Self {
        RawCell::Timestamp(value)
    }
}

impl<T: Into<RawCell>> From<Option<T>> for RawCell {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawCell::Absent, Into::into)
    }
}
