//! Binary record framing
//!
//! Each record in a topic log is laid out as:
//!
//! ```text
//! +------------------+
//! | Record ID        | (u32 LE)
//! +------------------+
//! | Payload Length   | (u32 LE)
//! +------------------+
//! | Payload          | (Payload Length bytes)
//! +------------------+
//! ```
//!
//! There is no file header, trailer, padding or checksum. Records are
//! concatenated back to back.

use std::borrow::Cow;
use std::io::{self, Read};

use super::errors::{RecordError, RecordResult};

/// Size of the id field in bytes
pub const ID_LEN: usize = 4;

/// Size of the fixed header (id + length) in bytes
pub const HEADER_LEN: usize = 8;

/// Largest payload the length field can describe
pub const MAX_PAYLOAD_LEN: u32 = u32::MAX;

/// Fixed-size prefix of every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Engine-assigned record id
    pub id: u32,
    /// Exact byte length of the payload that follows
    pub len: u32,
}

impl RecordHeader {
    /// Serialize the header to its on-disk form
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[..ID_LEN].copy_from_slice(&self.id.to_le_bytes());
        buf[ID_LEN..].copy_from_slice(&self.len.to_le_bytes());
        buf
    }

    /// Parse a header from its on-disk form
    pub fn from_bytes(buf: &[u8; HEADER_LEN]) -> Self {
        Self {
            id: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            len: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }

    /// Total bytes occupied by the record this header describes
    pub fn frame_len(self) -> u64 {
        HEADER_LEN as u64 + u64::from(self.len)
    }
}

/// A decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Engine-assigned record id (1-based, contiguous per topic)
    pub id: u32,
    /// Raw payload bytes, not necessarily valid UTF-8
    pub payload: Vec<u8>,
}

impl LogRecord {
    /// Create a record
    pub fn new(id: u32, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Payload rendered as text, replacing invalid UTF-8 sequences
    pub fn payload_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Serialize one record to bytes.
///
/// # Errors
///
/// Returns `PayloadTooLarge` if `payload` does not fit a u32 length field.
pub fn encode(id: u32, payload: &[u8]) -> RecordResult<Vec<u8>> {
    let len = u32::try_from(payload.len()).map_err(|_| RecordError::PayloadTooLarge {
        len: payload.len(),
        max: MAX_PAYLOAD_LEN,
    })?;

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&RecordHeader { id, len }.to_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Read only the header of the next record.
///
/// `offset` is the byte position of the reader within the log and is used
/// for error context only.
///
/// # Returns
///
/// - `Ok(Some(header))` if a full header was read
/// - `Ok(None)` if the stream ended cleanly before the record
/// - `Err(Truncated)` if the stream ended inside the header
pub fn read_header<R: Read>(reader: &mut R, offset: u64) -> RecordResult<Option<RecordHeader>> {
    let mut buf = [0u8; HEADER_LEN];
    let n = read_full(reader, &mut buf).map_err(|e| RecordError::io(offset, e))?;

    match n {
        0 => Ok(None),
        n if n < ID_LEN => Err(RecordError::truncated(
            offset,
            format!("partial id field: {} of {} bytes", n, ID_LEN),
        )),
        n if n < HEADER_LEN => Err(RecordError::truncated(
            offset,
            format!(
                "partial length field: {} of {} bytes",
                n - ID_LEN,
                HEADER_LEN - ID_LEN
            ),
        )),
        _ => Ok(Some(RecordHeader::from_bytes(&buf))),
    }
}

/// Read the payload described by `header`.
///
/// `offset` is the position of the record start, for error context.
pub fn read_payload<R: Read>(
    reader: &mut R,
    header: RecordHeader,
    offset: u64,
) -> RecordResult<Vec<u8>> {
    let expected = header.len as usize;
    // Cap the up-front allocation; a corrupt length must not reserve gigabytes.
    let mut payload = Vec::with_capacity(expected.min(64 * 1024));
    reader
        .take(u64::from(header.len))
        .read_to_end(&mut payload)
        .map_err(|e| RecordError::io(offset, e))?;

    if payload.len() < expected {
        return Err(RecordError::truncated(
            offset,
            format!(
                "record {} declares {} payload bytes, only {} available",
                header.id,
                expected,
                payload.len()
            ),
        ));
    }

    Ok(payload)
}

/// Decode the next full record.
///
/// # Returns
///
/// - `Ok(Some(record))` on success
/// - `Ok(None)` on clean end of stream (zero bytes before the id)
/// - `Err(Truncated)` if the header or payload is incomplete
pub fn decode<R: Read>(reader: &mut R, offset: u64) -> RecordResult<Option<LogRecord>> {
    let header = match read_header(reader, offset)? {
        Some(header) => header,
        None => return Ok(None),
    };
    let payload = read_payload(reader, header, offset)?;
    Ok(Some(LogRecord {
        id: header.id,
        payload,
    }))
}

/// Fill `buf` as far as the stream allows, returning the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
