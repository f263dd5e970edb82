//! Configuration options for a read operation.

use serde::{Deserialize, Serialize};

/// Which sheet of a workbook to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSelector<'a> {
    /// 0-based sheet position.
    Index(usize),
    /// Exact sheet name.
    Name(&'a str),
}

/// Options controlling how a source is read.
///
/// Deserializes with every field optional; missing fields take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Sheet to read from a workbook source. Default: `0`.
    pub sheet_index: usize,

    /// Sheet to read by exact name. Takes precedence over `sheet_index`.
    pub sheet_name: Option<String>,

    /// Field separator for delimited-text sources. Default: `','`.
    pub delimiter: char,

    /// Leading rows dropped before any filtering (header rows). Default: `1`.
    pub skip_rows: usize,

    /// Drop rows whose cells are all blank. Default: `true`.
    pub skip_empty_rows: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            sheet_index: 0,
            sheet_name: None,
            delimiter: ',',
            skip_rows: 1,
            skip_empty_rows: true,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet_index = index;
        self
    }

    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }

    #[must_use]
    pub fn with_skip_empty_rows(mut self, enable: bool) -> Self {
        self.skip_empty_rows = enable;
        self
    }

    /// Resolves the sheet selection; a name wins over an index.
    pub fn sheet_selector(&self) -> SheetSelector<'_> {
        match &self.sheet_name {
            Some(name) => SheetSelector::Name(name),
            None => SheetSelector::Index(self.sheet_index),
        }
    }
}
