//! Durable storage of a topic's last assigned record id
//!
//! Rewrites are all-or-nothing:
//! 1. Write the full new content to `<meta>.tmp`
//! 2. fsync the temp file
//! 3. Rename it over `<meta>` (atomic on POSIX)
//! 4. fsync the directory so the rename itself is durable
//!
//! A crash at any point leaves either the old or the new content, never a
//! partially written file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use super::errors::{CheckpointError, CheckpointResult};
use super::meta::{MetaFile, CREATED_AT_KEY, CREATED_BY_KEY, LAST_ID_KEY};
use crate::observability::{log_event_with_fields, Event};

/// Reads and writes `.meta` checkpoint files.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    /// Recorded as `created_by` on initialization
    created_by: String,
    /// Whether rewrites are fsynced before rename
    fsync: bool,
}

impl CheckpointStore {
    /// Create a store
    pub fn new(created_by: impl Into<String>, fsync: bool) -> Self {
        Self {
            created_by: created_by.into(),
            fsync,
        }
    }

    /// Write a fresh checkpoint with `last_message_id=0`.
    ///
    /// Overwrites any prior content. Only called when a topic is created.
    pub fn initialize(&self, path: &Path) -> CheckpointResult<()> {
        let mut meta = MetaFile::new();
        meta.set(LAST_ID_KEY, "0");
        meta.set(
            CREATED_AT_KEY,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        meta.set(CREATED_BY_KEY, self.created_by.as_str());
        self.persist(path, &meta)
    }

    /// Read the persisted last id.
    ///
    /// # Errors
    ///
    /// - `Missing` if the file does not exist
    /// - `Corrupt` if the file or its `last_message_id` cannot be parsed
    pub fn read(&self, path: &Path) -> CheckpointResult<u32> {
        self.load(path)?.last_id(path)
    }

    /// Replace the persisted last id, keeping every other key verbatim.
    pub fn write(&self, path: &Path, value: u32) -> CheckpointResult<()> {
        let mut meta = self.load(path)?;
        meta.set(LAST_ID_KEY, value.to_string());
        self.persist(path, &meta)?;

        let value = value.to_string();
        let path_display = path.display().to_string();
        log_event_with_fields(
            Event::CheckpointWritten,
            &[("last_message_id", &value), ("path", &path_display)],
        );
        Ok(())
    }

    /// Load and parse the whole meta file
    pub fn load(&self, path: &Path) -> CheckpointResult<MetaFile> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CheckpointError::Missing {
                path: path.to_path_buf(),
            },
            io::ErrorKind::InvalidData => {
                CheckpointError::corrupt(path, format!("not valid UTF-8: {}", e))
            }
            _ => CheckpointError::io(
                format!("failed to read checkpoint file {}", path.display()),
                e,
            ),
        })?;

        MetaFile::parse(path, &text)
    }

    fn persist(&self, path: &Path, meta: &MetaFile) -> CheckpointResult<()> {
        let temp = temp_path(path);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)
            .map_err(|e| {
                CheckpointError::io(
                    format!("failed to create temp checkpoint {}", temp.display()),
                    e,
                )
            })?;

        file.write_all(meta.render().as_bytes()).map_err(|e| {
            CheckpointError::io(
                format!("failed to write temp checkpoint {}", temp.display()),
                e,
            )
        })?;

        if self.fsync {
            file.sync_all().map_err(|e| {
                CheckpointError::io(
                    format!("failed to fsync temp checkpoint {}", temp.display()),
                    e,
                )
            })?;
        }
        drop(file);

        fs::rename(&temp, path).map_err(|e| {
            CheckpointError::io(
                format!("failed to move checkpoint into place at {}", path.display()),
                e,
            )
        })?;

        if self.fsync {
            if let Some(parent) = path.parent() {
                if let Ok(dir) = File::open(parent) {
                    let _ = dir.sync_all();
                }
            }
        }

        Ok(())
    }
}

/// `<path>.tmp`, next to the target so the rename stays on one filesystem
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
