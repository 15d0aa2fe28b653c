//! Asset loading errors

use thiserror::Error;

/// Error during model loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Asset not found
    #[error("asset not found: {0}")]
    NotFound(String),
    /// IO error while reading the asset or one of its buffers
    #[error("IO error: {0}")]
    Io(String),
    /// Parse/decode error
    #[error("parse error: {0}")]
    Parse(String),
    /// No loader handles this file extension
    #[error("unsupported format: {0}")]
    Unsupported(String),
    /// The worker running the load went away before reporting back
    #[error("load worker lost: {0}")]
    WorkerLost(String),
}

/// Result type for model loading
pub type LoadResult<T> = Result<T, LoadError>;

impl From<gltf::Error> for LoadError {
    fn from(err: gltf::Error) -> Self {
        match err {
            gltf::Error::Io(e) => Self::Io(e.to_string()),
            other => Self::Parse(other.to_string()),
        }
    }
}
