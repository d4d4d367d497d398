//! Log engine error types
//!
//! `TopicNotFound` and `RecordNotFound` are recoverable and leave no state
//! change behind; callers usually report them as informational messages.
//! Everything else indicates an I/O failure or an on-disk inconsistency.

use std::io;

use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::record::RecordError;
use crate::topic::TopicError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Log engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// The topic's log file does not exist
    #[error("topic '{0}' does not exist")]
    TopicNotFound(String),

    /// A seek scan reached end of log without meeting the target id
    #[error("record {id} not found in topic '{topic}'")]
    RecordNotFound { topic: String, id: u32 },

    /// The checkpoint is at `u32::MAX`; no further id can be assigned
    #[error("topic '{0}' has exhausted its record id space")]
    IdSpaceExhausted(String),

    /// Framing error, including a truncated log tail
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Checkpoint missing or corrupt on an existing-looking topic
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// Topic layout error
    #[error(transparent)]
    Topic(#[from] TopicError),

    /// Opening or appending to the log failed
    #[error("log I/O failed: {message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },
}

impl EngineError {
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
            Self::TopicNotFound(_) => "KAFKALITE_TOPIC_NOT_FOUND",
            Self::RecordNotFound { .. } => "KAFKALITE_RECORD_NOT_FOUND",
            Self::IdSpaceExhausted(_) => "KAFKALITE_ID_SPACE_EXHAUSTED",
            Self::Record(e) => e.code(),
            Self::Checkpoint(e) => e.code(),
            Self::Topic(e) => e.code(),
            Self::Io { .. } => "KAFKALITE_LOG_IO_ERROR",
        }
    }

    /// True for outcomes a CLI reports as plain messages
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::TopicNotFound(_) | Self::RecordNotFound { .. })
    }

    /// True if the log ended mid-record
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Record(e) if e.is_truncated())
    }
}
