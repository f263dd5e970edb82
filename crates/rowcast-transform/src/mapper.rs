//! Positional mapping of a raw row onto a record schema.

use rowcast_model::{DecodedRecord, RawCell, RecordSchema, RowDecodeError};
use tracing::debug;

use crate::coercion::{Coerced, Coercer};
use crate::diagnostics::redact_value;

static ABSENT: RawCell = RawCell::Absent;

/// Maps cell `i` of a row to field `i` of the schema.
///
/// Rows shorter than the schema leave the trailing fields absent; cells past
/// the last field are ignored. Coercion failures never abort the row: the
/// field is left absent, marked failed on the record and logged.
#[derive(Debug, Clone, Copy)]
pub struct RowMapper<'a> {
    schema: &'a RecordSchema,
    coercer: &'a Coercer,
}

impl<'a> RowMapper<'a> {
    pub fn new(schema: &'a RecordSchema, coercer: &'a Coercer) -> Self {
        Self { schema, coercer }
    }

    pub fn schema(&self) -> &'a RecordSchema {
        self.schema
    }

    pub fn map_row(&self, cells: &[RawCell]) -> DecodedRecord {
        let mut record = DecodedRecord::with_capacity(self.schema.len());
        for (position, field) in self.schema.fields().iter().enumerate() {
            let cell = cells.get(position).unwrap_or(&ABSENT);
            match self.coercer.coerce(cell, field.field_type) {
                Coerced::Value(value) => record.push(field.name.as_str(), Some(value)),
                Coerced::Empty => record.push(field.name.as_str(), None),
                Coerced::Failed(reason) => {
                    let raw = cell.to_string();
                    debug!(
                        field = %field.name,
                        target = %field.field_type,
                        raw = redact_value(&raw),
                        %reason,
                        "cell could not be converted; field left empty"
                    );
                    record.mark_failed(field.name.as_str());
                    record.push(field.name.as_str(), None);
                }
            }
        }
        record
    }

    /// Fails on the first required field that ended up absent.
    pub fn check_required(&self, record: &DecodedRecord) -> Result<(), RowDecodeError> {
        for (position, field) in self.schema.fields().iter().enumerate() {
            if field.required && record.value_at(position).is_none() {
                return Err(RowDecodeError::missing(field.name.as_str()));
            }
        }
        Ok(())
    }

    /// Maps the row and applies the required-field check.
    pub fn decode_row(&self, cells: &[RawCell]) -> Result<DecodedRecord, RowDecodeError> {
        let record = self.map_row(cells);
        self.check_required(&record)?;
        Ok(record)
    }
}
