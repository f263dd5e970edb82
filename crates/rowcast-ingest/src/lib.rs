//! Source ingestion for rowcast.
//!
//! This crate turns tabular sources into typed records:
//!
//! - **Delimited text**: line tokenizer with double-quote quoting, file checks
//! - **Workbook grids**: named sheets of already-decoded cells, loadable from JSON
//! - **Batch reader**: header skipping, empty-row filtering and per-row
//!   failure isolation on top of the schema-directed row mapper
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rowcast_ingest::{Source, read_all};
//! use rowcast_model::{DecodedRecord, ReadOptions, RecordSchema};
//!
//! let schema: RecordSchema = serde_json::from_str(&schema_json)?;
//! let source = Source::open(Path::new("employees.csv"))?;
//! let outcome = read_all::<DecodedRecord, _>(source, &schema, &ReadOptions::default())?;
//! println!("{} records", outcome.count());
//! ```

mod delimited;
mod error;
mod reader;
mod row;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Delimited Text ===
pub use delimited::{
    MAX_FILE_SIZE, check_file_size, check_file_size_with_limit, delimited_rows, open_delimited,
    render_line, tokenize_line, validate_delimiter, validate_encoding,
};

// === Workbook Grids ===
pub use workbook::{Sheet, SheetCell, Workbook, list_sheets, load_workbook};

// === Batch Reading ===
pub use reader::{
    ReadOutcome, RowFailure, RowOutcome, Source, is_workbook_path, read_all, read_all_with,
    read_delimited, read_delimited_file, read_rows, read_workbook,
};
pub use row::SourceRow;
