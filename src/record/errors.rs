//! Record codec error types
//!
//! Error codes:
//! - KAFKALITE_RECORD_TRUNCATED - log ends mid-record
//! - KAFKALITE_RECORD_TOO_LARGE - payload does not fit the length field
//! - KAFKALITE_RECORD_IO_ERROR - underlying read/write failure

use std::io;

use thiserror::Error;

/// Result type for record codec operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised while framing or parsing a single record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The stream ended inside a record (partial header or payload).
    ///
    /// Distinct from a clean end of stream, which is not an error.
    #[error("truncated record at byte offset {offset}: {reason}")]
    Truncated { offset: u64, reason: String },

    /// Payload length exceeds what the 32-bit length field can express.
    #[error("payload of {len} bytes exceeds the maximum record size of {max} bytes")]
    PayloadTooLarge { len: usize, max: u32 },

    /// Any other I/O failure.
    #[error("record I/O failed at byte offset {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

impl RecordError {
    /// Create a truncation error at the given offset
    pub fn truncated(offset: u64, reason: impl Into<String>) -> Self {
        Self::Truncated {
            offset,
            reason: reason.into(),
        }
    }

    /// Create an I/O error at the given offset
    pub fn io(offset: u64, source: io::Error) -> Self {
        Self::Io { offset, source }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "KAFKALITE_RECORD_TRUNCATED",
            Self::PayloadTooLarge { .. } => "KAFKALITE_RECORD_TOO_LARGE",
            Self::Io { .. } => "KAFKALITE_RECORD_IO_ERROR",
        }
    }

    /// Returns true if the log ended mid-record
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
