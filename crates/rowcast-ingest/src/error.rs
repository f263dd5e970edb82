//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole read.
///
/// Per-row and per-field problems never surface here; the batch reader
/// absorbs them into its [`ReadOutcome`](crate::ReadOutcome).
#[derive(Debug, Error)]
pub enum IngestError {
    // === Source Selection Errors ===
    /// Requested sheet index is past the last sheet.
    #[error("sheet index {index} out of range (workbook has {count} sheets)")]
    SheetIndexOutOfRange { index: usize, count: usize },

    /// No sheet carries the requested name.
    #[error("sheet '{name}' not found")]
    SheetNotFound { name: String },

    /// Workbook grid has no sheets at all.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    // === File System Errors ===
    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is {size} bytes, limit is {max_size}")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File starts with a byte-order mark of an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// I/O failure while reading rows from a stream.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    // === Format Errors ===
    /// Delimiter cannot separate fields.
    #[error("invalid delimiter {delimiter:?}: {reason}")]
    InvalidDelimiter {
        delimiter: char,
        reason: &'static str,
    },

    /// Workbook grid JSON is malformed.
    #[error("malformed workbook grid: {0}")]
    WorkbookFormat(#[from] serde_json::Error),

    /// Failed to render a delimited line.
    #[error("failed to render delimited line: {0}")]
    Render(#[from] csv::Error),
}

impl IngestError {
    /// True for the sheet-selection failures.
    pub fn is_source_selection(&self) -> bool {
        matches!(
            self,
            Self::SheetIndexOutOfRange { .. } | Self::SheetNotFound { .. } | Self::EmptyWorkbook
        )
    }

    pub(crate) fn open_failed(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/file.csv");

        let err = IngestError::SheetIndexOutOfRange { index: 3, count: 2 };
        assert_eq!(
            err.to_string(),
            "sheet index 3 out of range (workbook has 2 sheets)"
        );
    }

    #[test]
    fn test_source_selection_classification() {
        assert!(
            IngestError::SheetNotFound {
                name: "Q3".to_string()
            }
            .is_source_selection()
        );
        let io = std::io::Error::other("boom");
        assert!(!IngestError::from(io).is_source_selection());
    }

    #[test]
    fn test_open_failed_maps_not_found() {
        let err = IngestError::open_failed(
            std::path::Path::new("missing.csv"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, IngestError::FileNotFound { .. }));
        let err = IngestError::open_failed(
            std::path::Path::new("locked.csv"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
