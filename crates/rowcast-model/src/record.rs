//! Decoded records and conversion into caller-defined shapes.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::cell::format_number;
use crate::error::RowDecodeError;
use crate::schema::FieldType;

/// A coerced, type-native field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Long(i64),
    Decimal(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Long(_) => FieldType::Long,
            FieldValue::Decimal(_) => FieldType::Decimal,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::DateTime(_) => FieldType::DateTime,
            FieldValue::Boolean(_) => FieldType::Boolean,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Long(value) => write!(f, "{value}"),
            FieldValue::Decimal(value) => f.write_str(&format_number(*value)),
            FieldValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            FieldValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
            FieldValue::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// One named slot of a [`DecodedRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub name: String,
    pub value: Option<FieldValue>,
}

/// A decoded row: one optional value per schema field, in schema order.
///
/// Serializes as a JSON object keyed by field name, absent values as `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedRecord {
    fields: Vec<DecodedField>,
    failed_fields: Vec<String>,
}

impl DecodedRecord {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            failed_fields: Vec::new(),
        }
    }

    /// Appends a field at the next position.
    pub fn push(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        self.fields.push(DecodedField {
            name: name.into(),
            value,
        });
    }

    /// Records that a field could not be coerced and was left absent.
    pub fn mark_failed(&mut self, name: impl Into<String>) {
        self.failed_fields.push(name.into());
    }

    /// Names of fields whose source value could not be coerced.
    pub fn failed_fields(&self) -> &[String] {
        &self.failed_fields
    }

    pub fn fields(&self) -> &[DecodedField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value of a field, `None` when absent or unknown.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.slot(name).ok().and_then(Option::as_ref)
    }

    pub fn value_at(&self, position: usize) -> Option<&FieldValue> {
        self.fields
            .get(position)
            .and_then(|field| field.value.as_ref())
    }

    fn slot(&self, name: &str) -> Result<&Option<FieldValue>, RowDecodeError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
            .ok_or_else(|| RowDecodeError::UnknownField {
                field: name.to_string(),
            })
    }

    fn mismatch(name: &str, expected: FieldType, found: &FieldValue) -> RowDecodeError {
        RowDecodeError::TypeMismatch {
            field: name.to_string(),
            expected,
            found: found.field_type(),
        }
    }

    pub fn text(&self, name: &str) -> Result<Option<String>, RowDecodeError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Text(value)) => Ok(Some(value.clone())),
            Some(other) => Err(Self::mismatch(name, FieldType::Text, other)),
        }
    }

    pub fn integer(&self, name: &str) -> Result<Option<i32>, RowDecodeError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Integer(value)) => Ok(Some(*value)),
            Some(other) => Err(Self::mismatch(name, FieldType::Integer, other)),
        }
    }

    pub fn long(&self, name: &str) -> Result<Option<i64>, RowDecodeError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Long(value)) => Ok(Some(*value)),
            Some(other) => Err(Self::mismatch(name, FieldType::Long, other)),
        }
    }

    pub fn decimal(&self, name: &str) -> Result<Option<f64>, RowDecodeError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Decimal(value)) => Ok(Some(*value)),
            Some(other) => Err(Self::mismatch(name, FieldType::Decimal, other)),
        }
    }

    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>, RowDecodeError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Date(value)) => Ok(Some(*value)),
            Some(other) => Err(Self::mismatch(name, FieldType::Date, other)),
        }
    }

    pub fn datetime(&self, name: &str) -> Result<Option<NaiveDateTime>, RowDecodeError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::DateTime(value)) => Ok(Some(*value)),
            Some(other) => Err(Self::mismatch(name, FieldType::DateTime, other)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<Option<bool>, RowDecodeError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Boolean(value)) => Ok(Some(*value)),
            Some(other) => Err(Self::mismatch(name, FieldType::Boolean, other)),
        }
    }
}

impl Serialize for DecodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

/// Builds a caller-defined output shape from a decoded row.
///
/// Implementations pull fields through the typed getters of
/// [`DecodedRecord`]; any error drops the row from the batch.
///
/// ```ignore
/// struct Employee { name: String, age: Option<i32> }
///
/// impl FromRecord for Employee {
///     fn from_record(record: DecodedRecord) -> Result<Self, RowDecodeError> {
///         Ok(Self {
///             name: record.text("name")?.ok_or_else(|| RowDecodeError::missing("name"))?,
///             age: record.integer("age")?,
///         })
///     }
/// }
/// ```
pub trait FromRecord: Sized {
    fn from_record(record: DecodedRecord) -> Result<Self, RowDecodeError>;
}

impl FromRecord for DecodedRecord {
    fn from_record(record: DecodedRecord) -> Result<Self, RowDecodeError> {
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DecodedRecord {
        let mut record = DecodedRecord::with_capacity(3);
        record.push("name", Some(FieldValue::Text("Kim".to_string())));
        record.push("age", Some(FieldValue::Integer(32)));
        record.push("salary", None);
        record
    }

    #[test]
    fn test_typed_getters() {
        let record = sample();
        assert_eq!(record.text("name"), Ok(Some("Kim".to_string())));
        assert_eq!(record.integer("age"), Ok(Some(32)));
        assert_eq!(record.decimal("salary"), Ok(None));
        assert_eq!(record.value_at(1), Some(&FieldValue::Integer(32)));
    }

    #[test]
    fn test_getter_errors() {
        let record = sample();
        assert!(matches!(
            record.long("age"),
            Err(RowDecodeError::TypeMismatch {
                expected: FieldType::Long,
                found: FieldType::Integer,
                ..
            })
        ));
        assert!(matches!(
            record.text("missing"),
            Err(RowDecodeError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_failed_fields_are_tracked() {
        let mut record = sample();
        record.mark_failed("salary");
        assert_eq!(record.failed_fields(), ["salary".to_string()]);
        assert_eq!(record.get("salary"), None);
    }
}
