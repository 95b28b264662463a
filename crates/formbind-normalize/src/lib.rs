//! Report normalization.
//!
//! Turns a deserialized business-intelligence export into a
//! [`NormalizedDataset`](formbind_model::NormalizedDataset):
//!
//! - **columns**: key derivation, classification, synthetic key columns
//! - **rows**: positional zipping and grand-total filtering
//! - **rank**: primary-axis selection and distinct-value indices
//! - **form**: the `FormStructure` lookup built from a dataset
//!
//! Failures are returned as [`NormalizeError`](formbind_model::NormalizeError)
//! values; nothing here panics on malformed input.

#![deny(unsafe_code)]

mod backend;
mod columns;
mod document;
mod form;
mod metadata;
mod node;
pub mod options;
mod rank;
mod rows;

pub use backend::normalize_backend;
pub use columns::derive_key;
pub use document::{normalize_document, normalize_outcome};
pub use form::{build_form_metadata, build_form_structure, transform_dataset};
pub use metadata::parse_load_date;
pub use options::NormalizeOptions;
