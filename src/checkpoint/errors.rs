//! Checkpoint error types
//!
//! A missing or unparseable meta file on a topic whose log exists means the
//! topic was tampered with or a previous process died mid-update. These are
//! consistency violations and are reported distinctly from plain I/O errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Checkpoint store errors
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The meta file does not exist
    #[error("checkpoint file not found: {}", path.display())]
    Missing { path: PathBuf },

    /// The meta file exists but its content is unusable
    #[error("checkpoint file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Reading or rewriting the meta file failed
    #[error("checkpoint I/O failed: {message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },
}

impl CheckpointError {
    /// Create a corruption error
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "KAFKALITE_CHECKPOINT_MISSING",
            Self::Corrupt { .. } => "KAFKALITE_CHECKPOINT_CORRUPT",
            Self::Io { .. } => "KAFKALITE_CHECKPOINT_IO_ERROR",
        }
    }
}
