use thiserror::Error;

/// Reasons a raw export cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("report returned an error: {message}")]
    ReportError { message: String },

    #[error("missing {path} in report document")]
    MissingNode { path: String },

    #[error("{path} must be {expected}")]
    InvalidNode { path: String, expected: &'static str },

    #[error("column '{label}' has unknown type tag '{tag}'")]
    UnknownColumnType { label: String, tag: String },

    #[error("column key '{key}' for '{label}' collides even after field identifier fallback")]
    DuplicateColumnKey { key: String, label: String },
}

impl NormalizeError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingNode { path: path.into() }
    }

    pub fn invalid(path: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidNode {
            path: path.into(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
