//! Observable events for kafkalite
//!
//! Events are explicit and typed; each carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Engine opened against a topics directory
    EngineOpened,
    /// Injected crash point reached
    CrashPoint,

    // Topic layout
    /// Topic files created
    TopicCreated,
    /// Create requested for an existing topic
    TopicExists,
    /// Topic directory removed
    TopicDeleted,
    /// Operation targeted a topic that does not exist
    TopicMissing,

    // Log operations
    /// Record appended to a topic log
    RecordAppended,
    /// Checkpoint rewritten
    CheckpointWritten,
    /// Full or seek scan started
    ScanStarted,
    /// Scan hit a partial record
    ScanTruncated,
    /// Scan stopped on a read failure other than truncation
    ScanFailed,
    /// Seek scan reached end of log without the target id
    SeekMiss,

    // Secondary writer
    /// Text mirror write failed (record is still durable in the log)
    MirrorWriteFailed,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::EngineOpened => "ENGINE_OPENED",
            Event::CrashPoint => "CRASH_POINT",
            Event::TopicCreated => "TOPIC_CREATED",
            Event::TopicExists => "TOPIC_EXISTS",
            Event::TopicDeleted => "TOPIC_DELETED",
            Event::TopicMissing => "TOPIC_MISSING",
            Event::RecordAppended => "RECORD_APPENDED",
            Event::CheckpointWritten => "CHECKPOINT_WRITTEN",
            Event::ScanStarted => "SCAN_STARTED",
            Event::ScanTruncated => "SCAN_TRUNCATED",
            Event::ScanFailed => "SCAN_FAILED",
            Event::SeekMiss => "SEEK_MISS",
            Event::MirrorWriteFailed => "MIRROR_WRITE_FAILED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::CheckpointWritten | Event::ScanStarted => Severity::Trace,
            Event::EngineOpened
            | Event::TopicCreated
            | Event::TopicExists
            | Event::TopicDeleted
            | Event::RecordAppended
            | Event::SeekMiss => Severity::Info,
            Event::TopicMissing | Event::MirrorWriteFailed => Severity::Warn,
            Event::ScanTruncated | Event::ScanFailed => Severity::Error,
            Event::CrashPoint => Severity::Fatal,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
