use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info_span;

use rowcast_ingest::{ReadOutcome, Source, is_workbook_path, load_workbook, read_all};
use rowcast_model::{DecodedRecord, ReadOptions, RecordSchema};

use crate::cli::{OutputFormatArg, ReadArgs, SheetsArgs};
use crate::output::{
    failures_table, records_table, render_csv, render_json, sheets_table, summary_table,
};

/// A finished read together with the schema it was decoded against.
pub struct ReadReport {
    pub schema: RecordSchema,
    pub outcome: ReadOutcome<DecodedRecord>,
}

pub fn load_schema(path: &Path) -> Result<RecordSchema> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read schema {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse schema {}", path.display()))
}

pub fn read_options(args: &ReadArgs) -> ReadOptions {
    let mut options = ReadOptions::new()
        .with_sheet_index(args.sheet_index)
        .with_delimiter(args.delimiter)
        .with_skip_rows(args.skip_rows)
        .with_skip_empty_rows(!args.keep_empty_rows);
    if let Some(name) = &args.sheet_name {
        options = options.with_sheet_name(name.as_str());
    }
    options
}

pub fn run_read(args: &ReadArgs) -> Result<ReadReport> {
    let span = info_span!("read", file = %args.file.display());
    let _guard = span.enter();
    let schema = load_schema(&args.schema)?;
    let options = read_options(args);
    let source = Source::open(&args.file)
        .with_context(|| format!("open {}", args.file.display()))?;
    let outcome = read_all(source, &schema, &options)
        .with_context(|| format!("read {}", args.file.display()))?;
    Ok(ReadReport { schema, outcome })
}

/// Writes the records to `out` in the requested format.
pub fn write_records(
    report: &ReadReport,
    format: OutputFormatArg,
    out: &mut impl Write,
) -> Result<()> {
    let records = &report.outcome.records;
    match format {
        OutputFormatArg::Table => writeln!(out, "{}", records_table(&report.schema, records))?,
        OutputFormatArg::Json => writeln!(out, "{}", render_json(records)?)?,
        OutputFormatArg::Csv => write!(out, "{}", render_csv(&report.schema, records)?)?,
    }
    Ok(())
}

/// Prints the summary and any dropped rows to stderr.
pub fn print_summary(report: &ReadReport) {
    eprintln!("{}", summary_table(&report.outcome));
    if let Some(table) = failures_table(&report.outcome) {
        eprintln!("Dropped rows:");
        eprintln!("{table}");
    }
}

pub fn run_sheets(args: &SheetsArgs) -> Result<()> {
    if !is_workbook_path(&args.file) {
        bail!(
            "{} is not a workbook grid; only .json grids have sheets",
            args.file.display()
        );
    }
    let workbook =
        load_workbook(&args.file).with_context(|| format!("load {}", args.file.display()))?;
    let sheets: Vec<(String, usize)> = workbook
        .sheets()
        .iter()
        .map(|sheet| (sheet.name.clone(), sheet.rows.len()))
        .collect();
    println!("{}", sheets_table(&sheets));
    Ok(())
}
