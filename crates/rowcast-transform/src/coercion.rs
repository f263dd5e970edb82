//! Conversion of raw cells into typed field values.
//!
//! Coercion never fails the row. A cell that cannot be converted becomes an
//! absent field and the reason is handed back to the caller for logging.

use std::fmt;

use rowcast_model::{CellKind, FieldType, FieldValue, RawCell};

use crate::parse::{
    TextParse, parse_boolean_text, parse_decimal_text, parse_integer_text, truncate_to_i32,
    truncate_to_i64,
};
use crate::temporal::TemporalParser;

/// Why a present cell could not be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionFailure {
    /// Text left no parsable number after stripping.
    Unparsable,
    /// Number is not finite or does not fit the integer target.
    OutOfRange,
    /// Text is not one of the accepted boolean spellings.
    NotBoolean,
    /// Text matched none of the date or date-time patterns.
    NoTemporalMatch,
    /// The cell kind cannot be converted to the target at all.
    Incompatible(CellKind),
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparsable => write!(f, "no number could be parsed"),
            Self::OutOfRange => write!(f, "number out of range"),
            Self::NotBoolean => write!(f, "not a recognized boolean"),
            Self::NoTemporalMatch => write!(f, "matched no date/time pattern"),
            Self::Incompatible(kind) => write!(f, "{kind} cell cannot be converted"),
        }
    }
}

/// Result of coercing one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Value(FieldValue),
    /// Absent or blank source; not a failure.
    Empty,
    Failed(CoercionFailure),
}

impl Coerced {
    /// The value, with both `Empty` and `Failed` collapsing to `None`.
    pub fn into_value(self) -> Option<FieldValue> {
        match self {
            Coerced::Value(value) => Some(value),
            Coerced::Empty | Coerced::Failed(_) => None,
        }
    }

    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            Coerced::Value(value) => Some(value),
            Coerced::Empty | Coerced::Failed(_) => None,
        }
    }

    /// False only when a present value could not be converted.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Coerced::Failed(_))
    }
}

/// Converts cells to field values for a given target type.
///
/// Holds only immutable state, so one instance serves a whole read (and any
/// number of concurrent reads).
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    temporal: TemporalParser,
}

impl Coercer {
    pub fn new(temporal: TemporalParser) -> Self {
        Self { temporal }
    }

    pub fn temporal(&self) -> &TemporalParser {
        &self.temporal
    }

    /// Converts `cell` into a value of `target`.
    ///
    /// Absent cells are `Empty` for every target. Blank text is `Empty` for
    /// every target except `Text`, which keeps the string as-is.
    pub fn coerce(&self, cell: &RawCell, target: FieldType) -> Coerced {
        if cell.is_absent() {
            return Coerced::Empty;
        }
        match target {
            FieldType::Text => Coerced::Value(FieldValue::Text(cell.to_text())),
            FieldType::Integer => coerce_integer(
                cell,
                |text| parse_integer_text::<i32>(text).into_field(FieldValue::Integer),
                |number| truncate_to_i32(number).map(FieldValue::Integer),
            ),
            FieldType::Long => coerce_integer(
                cell,
                |text| parse_integer_text::<i64>(text).into_field(FieldValue::Long),
                |number| truncate_to_i64(number).map(FieldValue::Long),
            ),
            FieldType::Decimal => match cell {
                RawCell::Number(number) => Coerced::Value(FieldValue::Decimal(*number)),
                RawCell::Text(text) => parse_decimal_text(text).into_field(FieldValue::Decimal),
                other => Coerced::Failed(CoercionFailure::Incompatible(other.kind())),
            },
            FieldType::Boolean => match cell {
                RawCell::Boolean(value) => Coerced::Value(FieldValue::Boolean(*value)),
                RawCell::Number(number) => Coerced::Value(FieldValue::Boolean(*number != 0.0)),
                RawCell::Text(text) => match parse_boolean_text(text) {
                    TextParse::Blank => Coerced::Empty,
                    TextParse::Parsed(value) => Coerced::Value(FieldValue::Boolean(value)),
                    TextParse::Invalid => Coerced::Failed(CoercionFailure::NotBoolean),
                },
                other => Coerced::Failed(CoercionFailure::Incompatible(other.kind())),
            },
            FieldType::Date => match cell {
                RawCell::Timestamp(timestamp) => Coerced::Value(FieldValue::Date(timestamp.date())),
                RawCell::Text(text) if text.trim().is_empty() => Coerced::Empty,
                RawCell::Text(text) => match self.temporal.parse_date(text) {
                    Some(date) => Coerced::Value(FieldValue::Date(date)),
                    None => Coerced::Failed(CoercionFailure::NoTemporalMatch),
                },
                other => Coerced::Failed(CoercionFailure::Incompatible(other.kind())),
            },
            FieldType::DateTime => match cell {
                RawCell::Timestamp(timestamp) => Coerced::Value(FieldValue::DateTime(*timestamp)),
                RawCell::Text(text) if text.trim().is_empty() => Coerced::Empty,
                RawCell::Text(text) => match self.temporal.parse_datetime(text) {
                    Some(datetime) => Coerced::Value(FieldValue::DateTime(datetime)),
                    None => Coerced::Failed(CoercionFailure::NoTemporalMatch),
                },
                other => Coerced::Failed(CoercionFailure::Incompatible(other.kind())),
            },
        }
    }
}

fn coerce_integer(
    cell: &RawCell,
    from_text: impl FnOnce(&str) -> Coerced,
    from_number: impl FnOnce(f64) -> Option<FieldValue>,
) -> Coerced {
    match cell {
        RawCell::Text(text) => from_text(text),
        RawCell::Number(number) => match from_number(*number) {
            Some(value) => Coerced::Value(value),
            None => Coerced::Failed(CoercionFailure::OutOfRange),
        },
        other => Coerced::Failed(CoercionFailure::Incompatible(other.kind())),
    }
}

trait IntoField<T> {
    fn into_field(self, wrap: impl FnOnce(T) -> FieldValue) -> Coerced;
}

impl<T> IntoField<T> for TextParse<T> {
    fn into_field(self, wrap: impl FnOnce(T) -> FieldValue) -> Coerced {
        match self {
            TextParse::Blank => Coerced::Empty,
            TextParse::Parsed(value) => Coerced::Value(wrap(value)),
            TextParse::Invalid => Coerced::Failed(CoercionFailure::Unparsable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn coerce(cell: impl Into<RawCell>, target: FieldType) -> Coerced {
        Coercer::default().coerce(&cell.into(), target)
    }

    #[test]
    fn test_absent_is_empty_for_every_target() {
        for target in [
            FieldType::Text,
            FieldType::Integer,
            FieldType::Long,
            FieldType::Decimal,
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Boolean,
        ] {
            assert_eq!(coerce(RawCell::Absent, target), Coerced::Empty);
        }
    }

    #[test]
    fn test_text_target_stringifies() {
        assert_eq!(
            coerce(5500.0, FieldType::Text).into_value(),
            Some(FieldValue::Text("5500.0".to_string()))
        );
        assert_eq!(
            coerce(true, FieldType::Text).into_value(),
            Some(FieldValue::Text("true".to_string()))
        );
        assert_eq!(
            coerce("", FieldType::Text),
            Coerced::Value(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn test_numeric_cells_truncate() {
        assert_eq!(
            coerce(32.7, FieldType::Integer).into_value(),
            Some(FieldValue::Integer(32))
        );
        assert_eq!(
            coerce(-2.5, FieldType::Long).into_value(),
            Some(FieldValue::Long(-2))
        );
        assert_eq!(
            coerce(1.0e12, FieldType::Integer),
            Coerced::Failed(CoercionFailure::OutOfRange)
        );
    }

    #[test]
    fn test_text_numbers() {
        assert_eq!(
            coerce("28세", FieldType::Integer).into_value(),
            Some(FieldValue::Integer(28))
        );
        assert_eq!(
            coerce("8,500,000원", FieldType::Decimal).into_value(),
            Some(FieldValue::Decimal(8_500_000.0))
        );
        assert_eq!(coerce("", FieldType::Integer), Coerced::Empty);
        assert_eq!(
            coerce("none", FieldType::Long),
            Coerced::Failed(CoercionFailure::Unparsable)
        );
    }

    #[test]
    fn test_incompatible_kinds() {
        assert_eq!(
            coerce(true, FieldType::Decimal),
            Coerced::Failed(CoercionFailure::Incompatible(CellKind::Boolean))
        );
        assert_eq!(
            coerce(42.0, FieldType::Date),
            Coerced::Failed(CoercionFailure::Incompatible(CellKind::Number))
        );
    }

    #[test]
    fn test_boolean_numeric_truth() {
        assert_eq!(
            coerce(2.0, FieldType::Boolean).into_value(),
            Some(FieldValue::Boolean(true))
        );
        assert_eq!(
            coerce(0.0, FieldType::Boolean).into_value(),
            Some(FieldValue::Boolean(false))
        );
        // Text is whitelist-only, unlike numbers.
        assert_eq!(
            coerce("2", FieldType::Boolean),
            Coerced::Failed(CoercionFailure::NotBoolean)
        );
    }

    #[test]
    fn test_temporal_cross_conversion() {
        let timestamp = NaiveDate::from_ymd_opt(2025, 12, 8)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            coerce(timestamp, FieldType::Date).into_value(),
            Some(FieldValue::Date(timestamp.date()))
        );
        assert_eq!(
            coerce("2021-01-01", FieldType::DateTime).into_value(),
            Some(FieldValue::DateTime(
                NaiveDate::from_ymd_opt(2021, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            ))
        );
        assert_eq!(
            coerce("invalid-date", FieldType::Date),
            Coerced::Failed(CoercionFailure::NoTemporalMatch)
        );
        assert!(!coerce("invalid-date", FieldType::Date).is_ok());
    }
}
