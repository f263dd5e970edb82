//! Row-to-record transformation.
//!
//! This crate turns raw cells into typed field values:
//!
//! - **temporal**: ordered date / date-time pattern lists and the parser over them
//! - **parse**: lenient text parsers for integers, decimals and booleans
//! - **coercion**: per-target-type conversion of a [`RawCell`](rowcast_model::RawCell)
//! - **mapper**: positional mapping of a row onto a [`RecordSchema`](rowcast_model::RecordSchema)
//! - **diagnostics**: redaction of raw values in log events

pub mod coercion;
pub mod diagnostics;
pub mod error;
pub mod mapper;
pub mod parse;
pub mod temporal;

pub use coercion::{Coerced, Coercer, CoercionFailure};
pub use error::PatternError;
pub use mapper::RowMapper;
pub use temporal::{TemporalMatch, TemporalParser, TemporalPattern, TemporalPatterns};
