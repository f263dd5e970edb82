//! CLI argument definitions for rowcast.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rowcast",
    version,
    about = "Decode spreadsheet and delimited-text rows into typed records",
    long_about = "Decode spreadsheet and delimited-text rows into typed records.\n\n\
                  Columns are mapped by position onto a JSON schema. Cells that cannot\n\
                  be converted are left empty and rows that cannot be built are dropped;\n\
                  both are reported in the summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include raw cell values in log events (redacted by default).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode the rows of a file against a schema.
    Read(ReadArgs),

    /// List the sheets of a workbook grid.
    Sheets(SheetsArgs),
}

#[derive(Parser)]
pub struct ReadArgs {
    /// Source file: `.json` workbook grid or delimited text.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON schema file declaring the fields in column order.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Sheet to read by position (workbook grids only).
    #[arg(long = "sheet-index", value_name = "N", default_value_t = 0)]
    pub sheet_index: usize,

    /// Sheet to read by exact name; wins over --sheet-index.
    #[arg(long = "sheet-name", value_name = "NAME")]
    pub sheet_name: Option<String>,

    /// Field separator for delimited text.
    #[arg(long = "delimiter", short = 'd', default_value_t = ',')]
    pub delimiter: char,

    /// Leading rows to drop before decoding (header rows).
    #[arg(long = "skip-rows", value_name = "N", default_value_t = 1)]
    pub skip_rows: usize,

    /// Decode fully blank rows instead of skipping them.
    #[arg(long = "keep-empty-rows")]
    pub keep_empty_rows: bool,

    /// Output format for the decoded records.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct SheetsArgs {
    /// Workbook grid file (`.json`).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
