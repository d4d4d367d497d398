//! Record codec for topic logs
//!
//! Encodes and decodes single records to and from the binary log format.
//! The codec is stateless and knows nothing about files or topics.
//!
//! A clean end of stream (no bytes before the next id) is reported as
//! `Ok(None)`. Running out of bytes anywhere inside a record is reported as
//! `RecordError::Truncated`, so a partial write left by a crash is never
//! mistaken for a valid tail.

mod codec;
mod errors;

pub use codec::{
    decode, encode, read_header, read_payload, LogRecord, RecordHeader, HEADER_LEN,
    MAX_PAYLOAD_LEN,
};
pub use errors::{RecordError, RecordResult};
