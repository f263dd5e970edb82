//! Delimited-text sources: file checks and row iteration.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use rowcast_model::RawCell;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::row::SourceRow;

use super::tokenizer::{tokenize_line, validate_delimiter};

/// Maximum file size for delimited-text loading (500 MB default).
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::open_failed(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Rejects files that start with a UTF-16 byte-order mark.
///
/// A UTF-8 BOM is accepted and stripped while reading.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::open_failed(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }

    Ok(())
}

/// Opens a delimited-text file after the size and encoding checks.
pub fn open_delimited(path: &Path) -> Result<BufReader<File>> {
    check_file_size(path)?;
    validate_encoding(path)?;
    let file = File::open(path).map_err(|e| IngestError::open_failed(path, e))?;
    Ok(BufReader::new(file))
}

/// Iterates the lines of `reader` as tokenized rows.
///
/// Empty fields become [`RawCell::Absent`]; everything else is text. Row
/// indices are 0-based line numbers. Bytes that are not valid UTF-8 are
/// replaced with U+FFFD so a single mis-encoded line cannot end the read.
pub fn delimited_rows<R: BufRead>(
    reader: R,
    delimiter: char,
) -> Result<impl Iterator<Item = Result<SourceRow>>> {
    validate_delimiter(delimiter)?;
    Ok(reader.split(b'\n').enumerate().map(move |(index, bytes)| {
        let mut bytes = bytes?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(err) => {
                debug!(row = index, "invalid UTF-8 replaced");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        let line = if index == 0 {
            line.strip_prefix('\u{feff}').unwrap_or(line.as_str())
        } else {
            line.as_str()
        };
        let cells = tokenize_line(line, delimiter)
            .into_iter()
            .map(|field| {
                if field.is_empty() {
                    RawCell::Absent
                } else {
                    RawCell::Text(field)
                }
            })
            .collect();
        Ok(SourceRow::new(index, cells))
    }))
}
