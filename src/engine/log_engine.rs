//! Log engine: the only stateful orchestrator
//!
//! Per topic the state model is `NONEXISTENT -> EXISTS(last_id = N)`:
//! - `create_topic`: NONEXISTENT -> EXISTS(0)
//! - `produce`: EXISTS(N) -> EXISTS(N + 1)
//! - `delete_topic`: EXISTS(N) -> NONEXISTENT
//! - `consume`, `consume_from`, `last_id`: no transition
//!
//! # Produce ordering
//!
//! 1. Read checkpoint, compute `new_id = last + 1`
//! 2. Open the log (a vanished log fails here, before any id is spent)
//! 3. Rewrite checkpoint to `new_id` (atomic rename)
//! 4. Append `encode(new_id, payload)` to the log
//! 5. Hand the record to the secondary writer, if any
//!
//! A crash between 3 and 4 loses an id (a gap) but can never hand out the
//! same id twice.
//!
//! # Concurrency
//!
//! At most one producer per topic. The checkpoint read-modify-write is not
//! locked; concurrent producers on one topic can duplicate ids.

use std::io;

use super::errors::{EngineError, EngineResult};
use super::mirror::{MirrorEntry, SecondaryWriter, TextMirror};
use super::reader::{LogReader, Records};
use super::writer::LogWriter;
use crate::checkpoint::{CheckpointError, CheckpointStore};
use crate::config::EngineConfig;
use crate::crash_point::{maybe_crash, points};
use crate::observability::{log_event_with_fields, Event};
use crate::record;
use crate::topic::{CreateOutcome, DeleteOutcome, TopicLayout, TopicManager};

/// Single-process append-only topic log store.
pub struct LogEngine {
    config: EngineConfig,
    topics: TopicManager,
    checkpoints: CheckpointStore,
    mirror: Option<Box<dyn SecondaryWriter>>,
}

impl LogEngine {
    /// Open an engine over `config.topics_dir`.
    ///
    /// Nothing is created on disk until the first `create_topic`. Starts the
    /// text mirror worker if `config.mirror_text` is set.
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        let mirror: Option<Box<dyn SecondaryWriter>> = if config.mirror_text {
            let mirror = TextMirror::spawn()
                .map_err(|e| EngineError::io("failed to start text mirror worker", e))?;
            Some(Box::new(mirror))
        } else {
            None
        };
        Ok(Self::with_secondary_writer(config, mirror))
    }

    /// Open an engine with a caller-supplied secondary writer.
    ///
    /// `config.mirror_text` is ignored; `mirror` is used as given.
    pub fn with_secondary_writer(
        config: EngineConfig,
        mirror: Option<Box<dyn SecondaryWriter>>,
    ) -> Self {
        let checkpoints = CheckpointStore::new(config.created_by.clone(), config.fsync);
        let topics = TopicManager::new(&config.topics_dir, checkpoints.clone(), config.fsync);

        let root = config.topics_dir.display().to_string();
        let mirror_state = if mirror.is_some() { "on" } else { "off" };
        log_event_with_fields(
            Event::EngineOpened,
            &[("mirror", mirror_state), ("topics_dir", &root)],
        );

        Self {
            config,
            topics,
            checkpoints,
            mirror,
        }
    }

    /// Configuration in effect
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a topic. Idempotent: a second call reports `AlreadyExists`.
    pub fn create_topic(&self, name: &str) -> EngineResult<CreateOutcome> {
        Ok(self.topics.create(name)?)
    }

    /// True iff the topic's log exists
    pub fn topic_exists(&self, name: &str) -> EngineResult<bool> {
        Ok(self.topics.exists(name)?)
    }

    /// Names of all existing topics, sorted
    pub fn list_topics(&self) -> EngineResult<Vec<String>> {
        Ok(self.topics.list()?)
    }

    /// Append a record and return its newly assigned id.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if the topic's log does not exist
    /// - `Checkpoint(Missing | Corrupt)` if the meta file is unusable
    /// - `IdSpaceExhausted` if the topic already holds `u32::MAX` records
    /// - `Record(PayloadTooLarge)` if `payload` exceeds the length field
    pub fn produce(&self, name: &str, payload: impl AsRef<[u8]>) -> EngineResult<u32> {
        let payload = payload.as_ref();
        let layout = self.existing_layout(name)?;

        let last_id = self.checkpoints.read(layout.meta_path())?;
        let new_id = last_id
            .checked_add(1)
            .ok_or_else(|| EngineError::IdSpaceExhausted(name.to_string()))?;
        let frame = record::encode(new_id, payload)?;

        let mut writer = LogWriter::open(layout.log_path(), self.config.fsync)
            .map_err(|e| self.map_open_error(name, &layout, e))?;

        self.checkpoints.write(layout.meta_path(), new_id)?;
        maybe_crash(points::PRODUCE_AFTER_CHECKPOINT);

        writer.append(&frame)?;
        maybe_crash(points::PRODUCE_AFTER_APPEND);

        if let Some(mirror) = &self.mirror {
            mirror.submit(MirrorEntry {
                path: layout.mirror_path().to_path_buf(),
                id: new_id,
                payload: payload.to_vec(),
            });
        }

        let id = new_id.to_string();
        let bytes = payload.len().to_string();
        log_event_with_fields(
            Event::RecordAppended,
            &[("bytes", &bytes), ("id", &id), ("topic", name)],
        );

        Ok(new_id)
    }

    /// Iterate every record of the topic from the start of its log.
    ///
    /// Each call opens a fresh reader, so the sequence is restartable.
    pub fn consume(&self, name: &str) -> EngineResult<Records> {
        let layout = self.existing_layout(name)?;
        let reader = LogReader::open(layout.log_path())
            .map_err(|e| self.map_open_error(name, &layout, e))?;

        log_event_with_fields(Event::ScanStarted, &[("mode", "full"), ("topic", name)]);
        Ok(Records::new(name, reader))
    }

    /// Iterate records starting at the one whose id equals `target`.
    ///
    /// Scans forward from the start of the log reading headers only; the
    /// payload of every record before the match is skipped undecoded.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if the topic does not exist
    /// - `RecordNotFound` if no record with id `target` is present
    /// - `Record(Truncated)` if the log ends mid-record before a match
    pub fn consume_from(&self, name: &str, target: u32) -> EngineResult<Records> {
        let layout = self.existing_layout(name)?;
        let mut reader = LogReader::open(layout.log_path())
            .map_err(|e| self.map_open_error(name, &layout, e))?;

        let target_str = target.to_string();
        log_event_with_fields(
            Event::ScanStarted,
            &[("from_id", &target_str), ("mode", "seek"), ("topic", name)],
        );

        if !reader.seek_to_id(target)? {
            log_event_with_fields(
                Event::SeekMiss,
                &[("from_id", &target_str), ("topic", name)],
            );
            return Err(EngineError::RecordNotFound {
                topic: name.to_string(),
                id: target,
            });
        }

        Ok(Records::new(name, reader))
    }

    /// The topic's persisted last id (0 if nothing has been produced).
    ///
    /// # Errors
    ///
    /// `TopicNotFound` if the meta file is absent.
    pub fn last_id(&self, name: &str) -> EngineResult<u32> {
        let layout = self.topics.layout(name)?;
        self.checkpoints
            .read(layout.meta_path())
            .map_err(|e| match e {
                CheckpointError::Missing { .. } => EngineError::TopicNotFound(name.to_string()),
                other => EngineError::Checkpoint(other),
            })
    }

    /// Delete a topic and all its records.
    ///
    /// Pending secondary writes are flushed first so none lands in a
    /// directory that is being removed.
    pub fn delete_topic(&self, name: &str) -> EngineResult<DeleteOutcome> {
        if let Some(mirror) = &self.mirror {
            mirror.flush();
        }
        Ok(self.topics.delete(name)?)
    }

    /// Wait for the secondary writer to catch up
    pub fn flush_secondary(&self) {
        if let Some(mirror) = &self.mirror {
            mirror.flush();
        }
    }

    fn existing_layout(&self, name: &str) -> EngineResult<TopicLayout> {
        let layout = self.topics.layout(name)?;
        if !layout.exists() {
            log_event_with_fields(Event::TopicMissing, &[("topic", name)]);
            return Err(EngineError::TopicNotFound(name.to_string()));
        }
        Ok(layout)
    }

    fn map_open_error(&self, name: &str, layout: &TopicLayout, e: io::Error) -> EngineError {
        if e.kind() == io::ErrorKind::NotFound {
            EngineError::TopicNotFound(name.to_string())
        } else {
            EngineError::io(
                format!("failed to open log {}", layout.log_path().display()),
                e,
            )
        }
    }
}
