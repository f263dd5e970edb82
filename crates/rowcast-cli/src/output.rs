//! Rendering of decoded records and read summaries.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rowcast_ingest::ReadOutcome;
use rowcast_model::{DecodedRecord, RecordSchema};

/// Pretty-printed JSON array, one object per record, absent fields as `null`.
pub fn render_json(records: &[DecodedRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Delimited text with a header row of field names; absent fields are empty.
pub fn render_csv(schema: &RecordSchema, records: &[DecodedRecord]) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(schema.names())?;
    for record in records {
        writer.write_record(record.fields().iter().map(|field| {
            field
                .value
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        }))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One row per record; failed fields are marked in red.
pub fn records_table(schema: &RecordSchema, records: &[DecodedRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(schema.names().map(header_cell).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for record in records {
        let failed = record.failed_fields();
        table.add_row(record.fields().iter().map(|field| match &field.value {
            Some(value) => Cell::new(value),
            None if failed.contains(&field.name) => Cell::new("!").fg(Color::Red),
            None => dim_cell("-"),
        }));
    }
    table
}

pub fn summary_table<T>(outcome: &ReadOutcome<T>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Outcome"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Records").add_attribute(Attribute::Bold),
        Cell::new(outcome.count()).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Header rows skipped"), dim_cell(outcome.skipped_header)]);
    table.add_row(vec![Cell::new("Empty rows skipped"), dim_cell(outcome.skipped_empty)]);
    table.add_row(vec![
        Cell::new("Rows dropped"),
        count_cell(outcome.dropped(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Fields left empty"),
        count_cell(outcome.field_failures, Color::Yellow),
    ]);
    table
}

/// Dropped rows with their index and cause.
pub fn failures_table<T>(outcome: &ReadOutcome<T>) -> Option<Table> {
    if outcome.failures.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Cause")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for failure in &outcome.failures {
        table.add_row(vec![
            Cell::new(failure.index),
            Cell::new(&failure.cause).fg(Color::Red),
        ]);
    }
    Some(table)
}

pub fn sheets_table(sheets: &[(String, usize)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Sheet"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (index, (name, rows)) in sheets.iter().enumerate() {
        table.add_row(vec![Cell::new(index), Cell::new(name), Cell::new(rows)]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
