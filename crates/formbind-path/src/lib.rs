//! Schema-free addressing into nested JSON-like data.
//!
//! Paths are dot-delimited strings such as `series.0.name`. A segment made only
//! of ASCII digits addresses a sequence index; any other segment is a mapping
//! key. All operations are pure: inputs are never mutated.
//!
//! - [`get`] reads a location, yielding `None` on any miss
//! - [`set`] / [`delete`] return an updated copy of the root
//! - [`enumerate`] walks every node depth-first
//! - [`find_by_value`] / [`find_by_type`] filter that walk

#![deny(unsafe_code)]

pub mod access;
pub mod error;
pub mod expr;
pub mod walk;

pub use access::{MAX_INDEX_GAP, delete, delete_at, get, get_at, set, try_set, try_set_at};
pub use error::{PathError, Result};
pub use expr::{PathExpression, Segment};
pub use walk::{Entry, NodeKind, Walk, enumerate, find_by_type, find_by_value, stringify};
