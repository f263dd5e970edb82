//! Error types for schema construction and record decoding.

use thiserror::Error;

use crate::schema::FieldType;

/// Errors raised while building or parsing model definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A schema must declare at least one field.
    #[error("record schema has no fields")]
    EmptySchema,

    /// Field names must contain non-whitespace characters.
    #[error("field at position {position} has a blank name")]
    BlankFieldName { position: usize },

    /// Field names must be unique within a schema.
    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String },

    /// Unrecognized field type name.
    #[error("unknown field type '{value}'")]
    UnknownFieldType { value: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Failure to build one output record from a decoded row.
///
/// These are recovered by the batch reader: the row is dropped and reading
/// continues with the next one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowDecodeError {
    /// A required field decoded to absent.
    #[error("required field '{field}' is missing")]
    MissingRequired { field: String },

    /// The record has no field with this name.
    #[error("record has no field '{field}'")]
    UnknownField { field: String },

    /// The field holds a value of another type than the one requested.
    #[error("field '{field}' holds {found}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    /// Caller-defined construction failure.
    #[error("{0}")]
    Invalid(String),
}

impl RowDecodeError {
    /// Shorthand for [`RowDecodeError::MissingRequired`].
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::DuplicateField {
            name: "age".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate field name 'age'");

        let err = RowDecodeError::TypeMismatch {
            field: "age".to_string(),
            expected: FieldType::Integer,
            found: FieldType::Text,
        };
        assert_eq!(err.to_string(), "field 'age' holds text, expected integer");
    }

    #[test]
    fn test_missing_shorthand() {
        assert_eq!(
            RowDecodeError::missing("name").to_string(),
            "required field 'name' is missing"
        );
    }
}
