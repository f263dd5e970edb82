//! Positional record schemas.
//!
//! A [`RecordSchema`] is an ordered list of [`FieldSpec`]s. The position of a
//! field in the list is the 0-based column index it is read from; there is
//! no lookup of columns by header name.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Target type of a decoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// Free text.
    Text,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 64-bit floating point.
    Decimal,
    /// Calendar date without time.
    Date,
    /// Local date and time without zone.
    DateTime,
    Boolean,
}

impl FieldType {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Boolean => "boolean",
        }
    }

    /// Returns true for date and date-time targets.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    /// Parse a type name, case-insensitive, accepting common aliases.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "text" | "string" | "str" => Ok(FieldType::Text),
            "integer" | "int" | "i32" => Ok(FieldType::Integer),
            "long" | "i64" => Ok(FieldType::Long),
            "decimal" | "double" | "float" | "f64" => Ok(FieldType::Decimal),
            "date" => Ok(FieldType::Date),
            "datetime" | "date_time" | "timestamp" => Ok(FieldType::DateTime),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            _ => Err(ModelError::UnknownFieldType {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// Declaration of one field: name, target type, nullability and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Rows where this field decodes to absent are rejected.
    #[serde(default)]
    pub required: bool,
    /// Column index; assigned from the field's place in the schema.
    #[serde(skip)]
    pub position: usize,
}

impl FieldSpec {
    /// Creates a nullable field. The position is set when the schema is built.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            position: 0,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_nullable(&self) -> bool {
        !self.required
    }
}

/// Ordered, validated set of field declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDefinition")]
pub struct RecordSchema {
    fields: Vec<FieldSpec>,
}

#[derive(Deserialize)]
struct SchemaDefinition {
    fields: Vec<FieldSpec>,
}

impl TryFrom<SchemaDefinition> for RecordSchema {
    type Error = ModelError;

    fn try_from(value: SchemaDefinition) -> Result<Self> {
        RecordSchema::new(value.fields)
    }
}

impl RecordSchema {
    /// Validates the fields and assigns each its column position.
    ///
    /// # Errors
    ///
    /// Fails when the list is empty, a name is blank or a name repeats.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        let mut seen = HashSet::with_capacity(fields.len());
        let mut positioned = Vec::with_capacity(fields.len());
        for (position, mut field) in fields.into_iter().enumerate() {
            let name = field.name.trim();
            if name.is_empty() {
                return Err(ModelError::BlankFieldName { position });
            }
            if !seen.insert(name.to_string()) {
                return Err(ModelError::DuplicateField {
                    name: name.to_string(),
                });
            }
            field.name = name.to_string();
            field.position = position;
            positioned.push(field);
        }
        Ok(Self { fields: positioned })
    }

    pub fn builder() -> RecordSchemaBuilder {
        RecordSchemaBuilder::default()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

/// Incremental builder for [`RecordSchema`].
#[derive(Debug, Default, Clone)]
pub struct RecordSchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl RecordSchemaBuilder {
    /// Appends a nullable field at the next column position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec::new(name, field_type));
        self
    }

    /// Appends a required field at the next column position.
    #[must_use]
    pub fn required_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec::new(name, field_type).required());
        self
    }

    pub fn build(self) -> Result<RecordSchema> {
        RecordSchema::new(self.fields)
    }
}
