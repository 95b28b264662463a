use thiserror::Error;

/// Failure to address a location inside nested data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A node along the path is a scalar, or a key segment met a sequence.
    #[error("path '{path}' is unreachable at segment '{segment}'")]
    Unreachable { path: String, segment: String },
}

pub type Result<T> = std::result::Result<T, PathError>;
