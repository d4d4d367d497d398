//! Topic directory lifecycle
//!
//! The log file is the canonical existence marker. Create writes the
//! checkpoint before the log, so a crash in between leaves a topic that
//! does not exist yet and a retried create simply overwrites the stray
//! checkpoint.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use super::errors::{TopicError, TopicResult};
use super::layout::{validate_name, TopicLayout};
use crate::checkpoint::CheckpointStore;
use crate::crash_point::{maybe_crash, points};
use crate::observability::{log_event_with_fields, Event};

/// Informational result of `TopicManager::create`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Log and checkpoint were created
    Created,
    /// The log already existed; nothing was changed
    AlreadyExists,
}

/// Informational result of `TopicManager::delete`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The topic directory and all its files were removed
    Deleted,
    /// There was no topic directory
    NotFound,
}

/// Maps topic names to paths under one root and manages their files.
#[derive(Debug, Clone)]
pub struct TopicManager {
    root: PathBuf,
    checkpoints: CheckpointStore,
    fsync: bool,
}

impl TopicManager {
    /// Create a manager rooted at `root`
    pub fn new(root: impl Into<PathBuf>, checkpoints: CheckpointStore, fsync: bool) -> Self {
        Self {
            root: root.into(),
            checkpoints,
            fsync,
        }
    }

    /// Resolve the layout of `name`
    pub fn layout(&self, name: &str) -> TopicResult<TopicLayout> {
        TopicLayout::resolve(&self.root, name)
    }

    /// True iff the topic's log file exists
    pub fn exists(&self, name: &str) -> TopicResult<bool> {
        Ok(self.layout(name)?.exists())
    }

    /// Create the topic directory, an empty log and a zeroed checkpoint.
    ///
    /// A no-op returning `AlreadyExists` if the log is already present.
    pub fn create(&self, name: &str) -> TopicResult<CreateOutcome> {
        let layout = self.layout(name)?;

        fs::create_dir_all(layout.dir()).map_err(|e| {
            TopicError::io(
                format!("failed to create topic directory {}", layout.dir().display()),
                e,
            )
        })?;

        if layout.exists() {
            log_event_with_fields(Event::TopicExists, &[("topic", name)]);
            return Ok(CreateOutcome::AlreadyExists);
        }

        self.checkpoints.initialize(layout.meta_path())?;
        maybe_crash(points::CREATE_AFTER_CHECKPOINT);

        let log = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(layout.log_path())
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log_event_with_fields(Event::TopicExists, &[("topic", name)]);
                return Ok(CreateOutcome::AlreadyExists);
            }
            Err(e) => {
                return Err(TopicError::io(
                    format!("failed to create log {}", layout.log_path().display()),
                    e,
                ))
            }
        };

        if self.fsync {
            log.sync_all().map_err(|e| {
                TopicError::io(
                    format!("failed to fsync log {}", layout.log_path().display()),
                    e,
                )
            })?;
            if let Ok(dir) = File::open(layout.dir()) {
                let _ = dir.sync_all();
            }
        }

        log_event_with_fields(Event::TopicCreated, &[("topic", name)]);
        Ok(CreateOutcome::Created)
    }

    /// Remove every file in the topic directory, then the directory.
    ///
    /// Stops at the first failed removal and reports `DeleteFailed`; the
    /// directory is never removed in that case.
    pub fn delete(&self, name: &str) -> TopicResult<DeleteOutcome> {
        let layout = self.layout(name)?;
        let dir = layout.dir();

        if !dir.is_dir() {
            log_event_with_fields(Event::TopicMissing, &[("topic", name)]);
            return Ok(DeleteOutcome::NotFound);
        }

        let delete_failed = |path: &Path, source: io::Error| TopicError::DeleteFailed {
            topic: name.to_string(),
            path: path.to_path_buf(),
            source,
        };

        let entries = fs::read_dir(dir).map_err(|e| delete_failed(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| delete_failed(dir, e))?;
            let path = entry.path();
            fs::remove_file(&path).map_err(|e| delete_failed(&path, e))?;
        }

        fs::remove_dir(dir).map_err(|e| delete_failed(dir, e))?;

        log_event_with_fields(Event::TopicDeleted, &[("topic", name)]);
        Ok(DeleteOutcome::Deleted)
    }

    /// Names of all existing topics under the root, sorted.
    ///
    /// Directories that are not valid topic names or have no log are
    /// skipped. A missing root yields an empty list.
    pub fn list(&self) -> TopicResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(TopicError::io(
                    format!("failed to list topics in {}", self.root.display()),
                    e,
                ))
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                TopicError::io(
                    format!("failed to list topics in {}", self.root.display()),
                    e,
                )
            })?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if validate_name(&name).is_err() {
                continue;
            }
            if TopicLayout::resolve(&self.root, &name)?.exists() {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}
