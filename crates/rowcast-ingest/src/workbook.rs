//! In-memory workbook grids.
//!
//! A workbook is already decoded: named sheets of rows of cells. Grids are
//! loaded from JSON of the form
//!
//! ```json
//! {"sheets": [{"name": "Employees", "rows": [
//!     ["name", "age", "hired"],
//!     ["Kim", 28, {"timestamp": "2022-06-01T09:00:00"}],
//!     [null, {"formula": "B2+1", "result": 29}, {"error": "#DIV/0!"}]
//! ]}]}
//! ```
//!
//! Plain JSON scalars map to text, number and boolean cells, `null` to an
//! absent cell. Tagged objects (`{"text": ...}`, `{"timestamp": ...}`) give
//! the exact kind.

use std::fs;
use std::path::Path;

use rowcast_model::{RawCell, ReadOptions, SheetSelector};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::row::SourceRow;

/// One workbook cell as the container exposes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CellRepr")]
pub enum SheetCell {
    Value(RawCell),
    /// Evaluated formula; never counts as empty.
    Formula { formula: String, result: RawCell },
    /// Cell error such as `#DIV/0!`; read as absent.
    Error { error: String },
}

impl SheetCell {
    pub fn formula(formula: impl Into<String>, result: impl Into<RawCell>) -> Self {
        Self::Formula {
            formula: formula.into(),
            result: result.into(),
        }
    }

    pub fn error(code: impl Into<String>) -> Self {
        Self::Error { error: code.into() }
    }

    /// Emptiness for the skip-empty-rows policy.
    pub fn is_empty(&self) -> bool {
        match self {
            SheetCell::Value(cell) => cell.is_blank(),
            SheetCell::Formula { .. } => false,
            SheetCell::Error { .. } => true,
        }
    }

    /// The value the row mapper sees.
    pub fn to_raw(&self) -> RawCell {
        match self {
            SheetCell::Value(cell) => cell.clone(),
            SheetCell::Formula { result, .. } => result.clone(),
            SheetCell::Error { .. } => RawCell::Absent,
        }
    }
}

impl<T: Into<RawCell>> From<T> for SheetCell {
    fn from(value: T) -> Self {
        SheetCell::Value(value.into())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Formula {
        formula: String,
        #[serde(default)]
        result: Option<ValueRepr>,
    },
    Error {
        error: String,
    },
    Value(ValueRepr),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Null(()),
    Boolean(bool),
    Number(f64),
    Text(String),
    Tagged(RawCell),
}

impl From<ValueRepr> for RawCell {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Null(()) => RawCell::Absent,
            ValueRepr::Boolean(value) => RawCell::Boolean(value),
            ValueRepr::Number(value) => RawCell::Number(value),
            ValueRepr::Text(value) => RawCell::Text(value),
            ValueRepr::Tagged(cell) => cell,
        }
    }
}

impl From<CellRepr> for SheetCell {
    fn from(repr: CellRepr) -> Self {
        match repr {
            CellRepr::Formula { formula, result } => SheetCell::Formula {
                formula,
                result: result.map_or(RawCell::Absent, RawCell::from),
            },
            CellRepr::Error { error } => SheetCell::Error { error },
            CellRepr::Value(value) => SheetCell::Value(value.into()),
        }
    }
}

/// A named grid of cells. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Vec<SheetCell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<SheetCell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Rows in order, with error cells read as absent.
    pub fn source_rows(&self) -> impl Iterator<Item = SourceRow> + '_ {
        self.rows.iter().enumerate().map(|(index, row)| {
            let cells = row
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    if let SheetCell::Error { error } = cell {
                        debug!(
                            sheet = %self.name,
                            row = index,
                            column,
                            error = %error,
                            "error cell read as absent"
                        );
                    }
                    cell.to_raw()
                })
                .collect();
            let blank = row.iter().all(SheetCell::is_empty);
            SourceRow::with_blank(index, cells, blank)
        })
    }
}

/// An ordered set of sheets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Parses a workbook grid from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    pub fn sheet_by_index(&self, index: usize) -> Result<&Sheet> {
        self.sheets
            .get(index)
            .ok_or(IngestError::SheetIndexOutOfRange {
                index,
                count: self.sheets.len(),
            })
    }

    pub fn sheet_by_name(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| IngestError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// The sheet chosen by `options`; a sheet name wins over the index.
    pub fn select(&self, options: &ReadOptions) -> Result<&Sheet> {
        if self.sheets.is_empty() {
            return Err(IngestError::EmptyWorkbook);
        }
        let sheet = match options.sheet_selector() {
            SheetSelector::Name(name) => self.sheet_by_name(name)?,
            SheetSelector::Index(index) => self.sheet_by_index(index)?,
        };
        info!(sheet = %sheet.name, rows = sheet.rows.len(), "selected sheet");
        Ok(sheet)
    }
}

/// Loads a workbook grid from a JSON file, after the file size check.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    crate::delimited::check_file_size(path)?;
    let text = fs::read_to_string(path).map_err(|e| IngestError::open_failed(path, e))?;
    Workbook::from_json(&text)
}

/// Sheet names in workbook order.
pub fn list_sheets(workbook: &Workbook) -> Vec<String> {
    workbook.sheet_names()
}
