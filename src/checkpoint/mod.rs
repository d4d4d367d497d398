//! Checkpoint subsystem for kafkalite
//!
//! Each topic has one `.meta` file holding `last_message_id`, the id of the
//! most recently produced record (0 when nothing has been produced). It is
//! the only source of truth for id allocation; the log is never scanned to
//! work out the next id.
//!
//! # Design Principles
//!
//! - Whole-file load, mutate, whole-file rewrite
//! - Rewrites go through temp file + fsync + rename
//! - Unknown keys are preserved verbatim
//! - Missing and corrupt files are distinct errors

mod errors;
mod meta;
mod store;

pub use errors::{CheckpointError, CheckpointResult};
pub use meta::{MetaFile, CREATED_AT_KEY, CREATED_BY_KEY, LAST_ID_KEY};
pub use store::CheckpointStore;
