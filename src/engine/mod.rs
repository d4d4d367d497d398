//! Log engine
//!
//! Binds the record codec, the checkpoint store and the topic layout into
//! the public operations: create, produce, consume, seek, last id, delete.
//!
//! Durability contract:
//! - The checkpoint is rewritten before the record is appended
//! - The log is only ever appended to, never rewritten
//! - A partial tail record is reported, never silently skipped

mod errors;
mod log_engine;
mod mirror;
mod reader;
mod writer;

pub use errors::{EngineError, EngineResult};
pub use log_engine::LogEngine;
pub use mirror::{render_line, MirrorEntry, SecondaryWriter, TextMirror};
pub use reader::{LogReader, Records};
pub use writer::LogWriter;
