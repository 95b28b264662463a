//! Ingestion of report exports.
//!
//! Report exports arrive as markup or JSON. Markup is deserialized into the
//! same nested value shape a JSON export has, so the normalizer only ever sees
//! one representation.

#![deny(unsafe_code)]

pub mod error;
mod markup;
mod source;

pub use error::{IngestError, Result};
pub use markup::parse_markup;
pub use source::{Source, SourceFormat, load_json, load_source, load_value, parse_source};
