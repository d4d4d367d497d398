//! Crash point injection for durability testing
//!
//! When `KAFKALITE_CRASH_POINT` names a crash point, reaching that point
//! terminates the process via `std::process::abort()`: no cleanup, no
//! unwinding, no destructors.
//!
//! ```bash
//! KAFKALITE_CRASH_POINT=produce_after_checkpoint kafkalite produce orders -m x
//! ```

use std::sync::OnceLock;

use crate::observability::{log_event_with_fields, Event};

/// Environment variable selecting the active crash point
pub const CRASH_POINT_ENV: &str = "KAFKALITE_CRASH_POINT";

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var(CRASH_POINT_ENV).ok())
        .as_deref()
}

/// Returns true if `KAFKALITE_CRASH_POINT` equals `name`
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Abort the process if the named crash point is enabled
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        log_event_with_fields(Event::CrashPoint, &[("point", name)]);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    /// Checkpoint advanced, record not yet appended
    pub const PRODUCE_AFTER_CHECKPOINT: &str = "produce_after_checkpoint";
    /// Record appended, mirror not yet notified
    pub const PRODUCE_AFTER_APPEND: &str = "produce_after_append";
    /// Topic checkpoint written, log file not yet created
    pub const CREATE_AFTER_CHECKPOINT: &str = "create_after_checkpoint";
}
