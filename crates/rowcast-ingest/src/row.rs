//! A row as handed from a source to the batch reader.

use rowcast_model::RawCell;

/// One source row: its 0-based position in the source and its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub index: usize,
    pub cells: Vec<RawCell>,
    blank: bool,
}

impl SourceRow {
    /// Builds a row whose emptiness follows from its cells.
    pub fn new(index: usize, cells: Vec<RawCell>) -> Self {
        let blank = cells.iter().all(RawCell::is_blank);
        Self {
            index,
            cells,
            blank,
        }
    }

    /// Builds a row with emptiness decided by the source.
    ///
    /// Workbook rows use this: a formula cell keeps its row even when its
    /// result is blank.
    pub fn with_blank(index: usize, cells: Vec<RawCell>, blank: bool) -> Self {
        Self {
            index,
            cells,
            blank,
        }
    }

    /// True when every cell is absent or blank text.
    pub fn is_blank(&self) -> bool {
        self.blank
    }
}
