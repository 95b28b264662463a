//! Data model shared by the normalizer, the resolver, and their callers.
//!
//! - **dataset**: classified columns, filtered rows, and distinct-value indices
//! - **backend**: the `{ header, chartData }` transport payload
//! - **form**: the three-level `FormStructure` lookup
//! - **mapping**: user-authored field-mapping configuration

#![deny(unsafe_code)]

pub mod backend;
pub mod dataset;
pub mod error;
pub mod form;
pub mod mapping;

pub use backend::{BackendData, HeaderEntry};
pub use dataset::{
    Column, ColumnKind, DataRow, NormalizeOutcome, NormalizedDataset, NormalizedReport,
    ReportMetadata, cell_text,
};
pub use error::{NormalizeError, Result};
pub use form::{FieldMeta, FormMetadata, FormStructure, TransformedData};
pub use mapping::{
    DataTransformation, FieldMappingConfig, HybridEntry, HybridEntryType, InvalidEntry,
    LookupKey, MappedConfig, MappingSet, TransformKind,
};
