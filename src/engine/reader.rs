//! Sequential log reader and record iterator
//!
//! Two scan modes:
//! - Full scan: decode every record from the start until clean end of log
//! - Seek scan: read headers only, skipping each payload span without
//!   decoding it, until a header with the target id is found
//!
//! A partial record at the tail is reported as `Truncated` in both modes and
//! never treated as end of log. Other read failures end a scan the same way
//! but are logged as `SCAN_FAILED`.

use std::fs::File;
use std::io::{self, BufReader};
use std::iter::FusedIterator;
use std::path::Path;

use super::errors::{EngineError, EngineResult};
use crate::observability::{log_event_with_fields, Event};
use crate::record::{self, LogRecord, RecordError, RecordHeader, RecordResult, HEADER_LEN};

/// Forward-only reader over one topic log.
pub struct LogReader {
    /// Buffered reader
    reader: BufReader<File>,
    /// Byte offset of the next unread record
    offset: u64,
    /// Log size as last observed
    file_size: u64,
}

impl LogReader {
    /// Open a log for reading from the first record.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            offset: 0,
            file_size,
        })
    }

    /// Byte offset of the next unread record
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decode the next record.
    ///
    /// `Ok(None)` at clean end of log; `Err(Truncated)` on a partial record.
    pub fn read_next(&mut self) -> RecordResult<Option<LogRecord>> {
        let record = record::decode(&mut self.reader, self.offset)?;
        if let Some(ref record) = record {
            self.offset += (HEADER_LEN + record.payload.len()) as u64;
        }
        Ok(record)
    }

    /// Advance to the first record whose id equals `target`.
    ///
    /// Returns `true` with the reader positioned at the start of that
    /// record, or `false` after reaching clean end of log. Every record
    /// before the match is skipped without decoding its payload.
    pub fn seek_to_id(&mut self, target: u32) -> RecordResult<bool> {
        loop {
            let start = self.offset;
            let header = match record::read_header(&mut self.reader, start)? {
                Some(header) => header,
                None => return Ok(false),
            };

            if header.id == target {
                // Un-read the header so the next decode starts at the record.
                self.reader
                    .seek_relative(-(HEADER_LEN as i64))
                    .map_err(|e| RecordError::io(start, e))?;
                return Ok(true);
            }

            self.skip_payload(start, header)?;
        }
    }

    /// Skip the payload of the record starting at `start` whose header has
    /// just been consumed.
    fn skip_payload(&mut self, start: u64, header: RecordHeader) -> RecordResult<()> {
        let end = start + header.frame_len();
        if end > self.file_size {
            self.refresh_file_size(start)?;
        }
        if end > self.file_size {
            return Err(RecordError::truncated(
                start,
                format!(
                    "record {} declares {} payload bytes, only {} available",
                    header.id,
                    header.len,
                    self.file_size.saturating_sub(start + HEADER_LEN as u64)
                ),
            ));
        }

        self.reader
            .seek_relative(i64::from(header.len))
            .map_err(|e| RecordError::io(start, e))?;
        self.offset = end;
        Ok(())
    }

    fn refresh_file_size(&mut self, offset: u64) -> RecordResult<()> {
        self.file_size = self
            .reader
            .get_ref()
            .metadata()
            .map_err(|e| RecordError::io(offset, e))?
            .len();
        Ok(())
    }
}

/// Lazy, finite iterator over the records of one topic.
///
/// Yields `Ok(record)` in file order until clean end of log. A truncated or
/// unreadable record yields one `Err` and ends the iteration.
pub struct Records {
    topic: String,
    reader: LogReader,
    done: bool,
}

impl Records {
    /// Iterate from the reader's current position
    pub fn new(topic: impl Into<String>, reader: LogReader) -> Self {
        Self {
            topic: topic.into(),
            reader,
            done: false,
        }
    }
}

impl Iterator for Records {
    type Item = EngineResult<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                let offset = self.reader.offset().to_string();
                let reason = e.to_string();
                log_event_with_fields(
                    scan_error_event(&e),
                    &[
                        ("offset", &offset),
                        ("reason", &reason),
                        ("topic", &self.topic),
                    ],
                );
                Some(Err(EngineError::from(e)))
            }
        }
    }
}

impl FusedIterator for Records {}

fn scan_error_event(e: &RecordError) -> Event {
    if e.is_truncated() {
        Event::ScanTruncated
    } else {
        Event::ScanFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, records: &[(u32, &str)]) -> PathBuf {
        let path = dir.path().join("t.log");
        let mut bytes = Vec::new();
        for (id, payload) in records {
            bytes.extend(record::encode(*id, payload.as_bytes()).unwrap());
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_read_all_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[(1, "a"), (2, "bb"), (3, "")]);

        let records: Vec<_> = Records::new("t", LogReader::open(&path).unwrap())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            records,
            vec![
                LogRecord::new(1, b"a".to_vec()),
                LogRecord::new(2, b"bb".to_vec()),
                LogRecord::new(3, Vec::new()),
            ]
        );
    }

    #[test]
    fn test_truncated_tail_yields_prior_records_then_error() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[(1, "first"), (2, "second")]);
        let len = fs::metadata(&path).unwrap().len();
        let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(len - 2).unwrap();

        let mut records = Records::new("t", LogReader::open(&path).unwrap());
        assert_eq!(records.next().unwrap().unwrap().id, 1);
        let err = records.next().unwrap().unwrap_err();
        assert!(err.is_truncated());
        assert!(records.next().is_none());
    }

    #[test]
    fn test_seek_skips_payload_spans() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[(1, "hello"), (2, "x")]);
        let mut reader = LogReader::open(&path).unwrap();

        assert!(reader.seek_to_id(2).unwrap());
        assert_eq!(reader.offset(), 13);
        assert_eq!(reader.read_next().unwrap().unwrap().payload, b"x".to_vec());
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_skip_past_short_payload_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.log");
        let mut bytes = record::encode(1, b"payload").unwrap();
        bytes.truncate(10);
        fs::write(&path, bytes).unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(reader.seek_to_id(2).unwrap_err().is_truncated());
    }

    #[test]
    fn test_scan_error_event_by_kind() {
        assert_eq!(
            scan_error_event(&RecordError::truncated(0, "short")),
            Event::ScanTruncated
        );
        let io_err = RecordError::io(0, io::Error::new(io::ErrorKind::Other, "disk"));
        assert_eq!(scan_error_event(&io_err), Event::ScanFailed);
    }

    #[test]
    fn test_seek_to_id_positions_at_match() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[(1, "a"), (2, "b"), (3, "c")]);
        let mut reader = LogReader::open(&path).unwrap();

        assert!(reader.seek_to_id(2).unwrap());
        assert_eq!(reader.offset(), 9);
        let rest: Vec<u32> = Records::new("t", reader)
            .map(|r| r.unwrap().id)
            .collect();
        assert_eq!(rest, vec![2, 3]);
    }

    #[test]
    fn test_seek_to_missing_id() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[(1, "a"), (2, "b")]);
        let mut reader = LogReader::open(&path).unwrap();
        assert!(!reader.seek_to_id(7).unwrap());
    }
}
