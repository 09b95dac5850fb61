//! Error types for artifact I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for artifact I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading or saving model artifacts.
///
/// Artifacts are static, locally resident files; every load failure is
/// fatal and surfaced immediately, with no retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Unexpected end of file.
    #[error("unexpected end of file after {position} bytes")]
    UnexpectedEof {
        /// Bytes successfully read before EOF.
        position: u64,
    },

    /// The NPY array's dtype or shape is not usable as a mode matrix.
    #[error("unsupported NPY array: {0}")]
    UnsupportedNpy(String),

    /// The loaded artifact failed the model's dimension checks.
    #[error(transparent)]
    Model(#[from] ssm_core::SsmError),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Creates an invalid content error.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
