//! Append-only log writer
//!
//! The writer never creates a log: a topic exists iff its log exists, and
//! only `TopicManager::create` may bring one into being. Opening a missing
//! log fails with `NotFound`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{EngineError, EngineResult};

/// Appends encoded records to the end of one topic log.
pub struct LogWriter {
    /// Path to the log file
    path: PathBuf,
    /// Underlying file handle, opened in append mode
    file: File,
    /// fsync after every append
    fsync: bool,
}

impl LogWriter {
    /// Open an existing log for appending.
    pub fn open(path: &Path, fsync: bool) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            fsync,
        })
    }

    /// Append one encoded record, fsyncing if configured.
    ///
    /// A failure part-way through leaves a truncated tail, which readers
    /// report as `Truncated`.
    pub fn append(&mut self, frame: &[u8]) -> EngineResult<()> {
        self.file.write_all(frame).map_err(|e| {
            EngineError::io(
                format!("failed to append to log {}", self.path.display()),
                e,
            )
        })?;

        if self.fsync {
            self.file.sync_data().map_err(|e| {
                EngineError::io(format!("failed to fsync log {}", self.path.display()), e)
            })?;
        }

        Ok(())
    }
}
