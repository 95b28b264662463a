use formbind_model::TransformKind;
use formbind_path::PathError;
use serde::Serialize;
use thiserror::Error;

/// Failure while resolving a single mapping field.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("no transformation registered for kind '{}'", .kind.as_str())]
    UnknownTransform { kind: TransformKind },

    #[error("{} transformation failed: {message}", .kind.as_str())]
    Transform {
        kind: TransformKind,
        message: String,
    },

    #[error("invalid mapping entry: {message}")]
    InvalidConfig { message: String },

    #[error("hybrid entry '{entry}' has an invalid lookup: {source}")]
    InvalidLookup {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ResolveError {
    pub fn transform(kind: TransformKind, message: impl Into<String>) -> Self {
        Self::Transform {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;

/// A field whose resolution failed. The field kept its prior value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

impl FieldFailure {
    pub(crate) fn new(field: &str, error: &ResolveError) -> Self {
        Self {
            field: field.to_string(),
            message: error.to_string(),
        }
    }
}
