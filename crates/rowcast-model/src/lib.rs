//! Data model shared by the rowcast crates.
//!
//! - **cell**: canonical scalar kinds produced by source adapters
//! - **schema**: ordered, positional field declarations
//! - **record**: decoded rows and the `FromRecord` bridge to caller types
//! - **options**: read configuration (sheet selection, delimiter, skipping)

pub mod cell;
pub mod error;
pub mod options;
pub mod record;
pub mod schema;

pub use cell::{CellKind, RawCell, format_number};
pub use error::{ModelError, Result, RowDecodeError};
pub use options::{ReadOptions, SheetSelector};
pub use record::{DecodedField, DecodedRecord, FieldValue, FromRecord};
pub use schema::{FieldSpec, FieldType, RecordSchema, RecordSchemaBuilder};
