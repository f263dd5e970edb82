//! The row-batch reader.
//!
//! Reading is a single pass over the source rows:
//!
//! 1. drop the first `skip_rows` rows unconditionally (header rows)
//! 2. drop blank rows when `skip_empty_rows` is set
//! 3. map the row onto the schema and build the caller's record type
//! 4. keep the record, or log and record the failure and move on
//!
//! Only source-level failures (I/O, sheet selection) end a read early.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use rowcast_model::{FromRecord, ReadOptions, RecordSchema, RowDecodeError};
use rowcast_transform::{Coercer, RowMapper};
use tracing::{info, info_span, warn};

use crate::delimited::{delimited_rows, open_delimited};
use crate::error::Result;
use crate::row::SourceRow;
use crate::workbook::{Workbook, load_workbook};

/// A dropped row: its 0-based source index and why it was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub index: usize,
    pub cause: RowDecodeError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.index, self.cause)
    }
}

/// Outcome of decoding one row.
pub type RowOutcome<T> = std::result::Result<T, RowFailure>;

/// Everything a read produced, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome<T> {
    pub records: Vec<T>,
    /// Rows dropped because the record could not be built.
    pub failures: Vec<RowFailure>,
    /// Rows dropped by the header skip.
    pub skipped_header: usize,
    /// Rows dropped by the empty-row policy.
    pub skipped_empty: usize,
    /// Fields left absent because their cell could not be converted.
    pub field_failures: usize,
}

impl<T> Default for ReadOutcome<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
            skipped_header: 0,
            skipped_empty: 0,
            field_failures: 0,
        }
    }
}

impl<T> ReadOutcome<T> {
    /// Number of records produced.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn dropped(&self) -> usize {
        self.failures.len()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

/// Where rows come from.
#[derive(Debug)]
pub enum Source<R> {
    /// Delimited text, one row per line.
    Delimited(R),
    /// A decoded workbook; the sheet is chosen by the read options.
    Workbook(Workbook),
}

impl Source<std::io::BufReader<std::fs::File>> {
    /// Opens a file: `.json` files are workbook grids, anything else is
    /// delimited text.
    pub fn open(path: &Path) -> Result<Self> {
        if is_workbook_path(path) {
            Ok(Source::Workbook(load_workbook(path)?))
        } else {
            Ok(Source::Delimited(open_delimited(path)?))
        }
    }
}

/// True for paths read as workbook grids (`.json`, any case).
pub fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Decodes rows into `T`, isolating per-row failures.
///
/// Row iteration errors abort the read; everything else is absorbed into the
/// outcome.
pub fn read_rows<T, I>(
    rows: I,
    schema: &RecordSchema,
    options: &ReadOptions,
    coercer: &Coercer,
) -> Result<ReadOutcome<T>>
where
    T: FromRecord,
    I: IntoIterator<Item = Result<SourceRow>>,
{
    let mapper = RowMapper::new(schema, coercer);
    let mut outcome = ReadOutcome::default();

    for (position, row) in rows.into_iter().enumerate() {
        let row = row?;
        if position < options.skip_rows {
            outcome.skipped_header += 1;
            continue;
        }
        if options.skip_empty_rows && row.is_blank() {
            outcome.skipped_empty += 1;
            continue;
        }
        let (decoded, field_failures) = decode_row::<T>(&mapper, &row);
        outcome.field_failures += field_failures;
        match decoded {
            Ok(record) => outcome.records.push(record),
            Err(failure) => {
                warn!(row = failure.index, cause = %failure.cause, "dropping row");
                outcome.failures.push(failure);
            }
        }
    }

    info!(
        records = outcome.count(),
        dropped = outcome.dropped(),
        skipped_empty = outcome.skipped_empty,
        field_failures = outcome.field_failures,
        "read complete"
    );
    Ok(outcome)
}

fn decode_row<T: FromRecord>(mapper: &RowMapper<'_>, row: &SourceRow) -> (RowOutcome<T>, usize) {
    let record = mapper.map_row(&row.cells);
    let field_failures = record.failed_fields().len();
    let decoded = mapper
        .check_required(&record)
        .and_then(|()| T::from_record(record))
        .map_err(|cause| RowFailure {
            index: row.index,
            cause,
        });
    (decoded, field_failures)
}

/// Reads delimited text from any buffered reader.
pub fn read_delimited<T, R>(
    reader: R,
    schema: &RecordSchema,
    options: &ReadOptions,
    coercer: &Coercer,
) -> Result<ReadOutcome<T>>
where
    T: FromRecord,
    R: BufRead,
{
    let _span = info_span!("read_delimited", delimiter = ?options.delimiter).entered();
    read_rows(
        delimited_rows(reader, options.delimiter)?,
        schema,
        options,
        coercer,
    )
}

/// Reads a delimited-text file after the size and encoding checks.
pub fn read_delimited_file<T: FromRecord>(
    path: &Path,
    schema: &RecordSchema,
    options: &ReadOptions,
    coercer: &Coercer,
) -> Result<ReadOutcome<T>> {
    let _span = info_span!("read_file", path = %path.display()).entered();
    let reader = open_delimited(path)?;
    read_delimited(reader, schema, options, coercer)
}

/// Reads the sheet chosen by `options` from a workbook.
pub fn read_workbook<T: FromRecord>(
    workbook: &Workbook,
    schema: &RecordSchema,
    options: &ReadOptions,
    coercer: &Coercer,
) -> Result<ReadOutcome<T>> {
    let sheet = workbook.select(options)?;
    let _span = info_span!("read_sheet", sheet = %sheet.name).entered();
    read_rows(sheet.source_rows().map(Ok), schema, options, coercer)
}

/// Reads any source with the standard temporal patterns.
pub fn read_all<T, R>(
    source: Source<R>,
    schema: &RecordSchema,
    options: &ReadOptions,
) -> Result<ReadOutcome<T>>
where
    T: FromRecord,
    R: BufRead,
{
    read_all_with(source, schema, options, &Coercer::default())
}

/// Reads any source with a caller-supplied coercer.
pub fn read_all_with<T, R>(
    source: Source<R>,
    schema: &RecordSchema,
    options: &ReadOptions,
    coercer: &Coercer,
) -> Result<ReadOutcome<T>>
where
    T: FromRecord,
    R: BufRead,
{
    match source {
        Source::Delimited(reader) => read_delimited(reader, schema, options, coercer),
        Source::Workbook(workbook) => read_workbook(&workbook, schema, options, coercer),
    }
}
