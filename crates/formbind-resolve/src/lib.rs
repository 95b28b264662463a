//! Mapping resolution.
//!
//! Resolves user-authored field-mapping configurations into output
//! properties:
//!
//! - `manual` entries yield their literal value
//! - `mapped` entries read `FormStructure[chaField][chaValue][kfField]`,
//!   optionally writing into a sub-location of the target property
//! - `hybrid` entries assemble an object from several entries, then run
//!   caller-registered [`Transform`]s over it in order
//!
//! Each field resolves independently. A failing field keeps its base value
//! and is reported in [`Resolution::failures`]; the call never aborts.

#![deny(unsafe_code)]

pub mod error;
mod resolver;
mod ticket;
pub mod transform;

pub use error::{FieldFailure, ResolveError, Result};
pub use resolver::{Resolution, resolve, resolve_dataset};
pub use ticket::{ResolveGeneration, ResolveTicket};
pub use transform::{FnTransform, Transform, TransformRegistry};
