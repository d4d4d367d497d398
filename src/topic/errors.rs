//! Topic directory error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::checkpoint::CheckpointError;

/// Result type for topic directory operations
pub type TopicResult<T> = Result<T, TopicError>;

/// Topic directory errors
#[derive(Debug, Error)]
pub enum TopicError {
    /// The name cannot be used as a directory and file stem
    #[error("invalid topic name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A file under the topic directory could not be removed.
    ///
    /// The directory is left in place for inspection.
    #[error("failed to delete topic '{topic}' at {}: {source}", path.display())]
    DeleteFailed {
        topic: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Initializing the checkpoint during create failed
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// Other filesystem failure
    #[error("topic I/O failed: {message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },
}

impl TopicError {
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
            Self::InvalidName { .. } => "KAFKALITE_TOPIC_INVALID_NAME",
            Self::DeleteFailed { .. } => "KAFKALITE_TOPIC_DELETE_FAILED",
            Self::Checkpoint(e) => e.code(),
            Self::Io { .. } => "KAFKALITE_TOPIC_IO_ERROR",
        }
    }
}
