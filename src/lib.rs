//! kafkalite - a single-process, file-backed, append-only topic log
//!
//! Each topic is a directory holding a binary record log and a checkpoint
//! of the last assigned record id:
//!
//! ```text
//! <topics_dir>/
//!   orders/
//!     orders.log    [id u32 LE][len u32 LE][payload] ...
//!     orders.meta   last_message_id=N
//!     orders.txt    optional text mirror
//! ```
//!
//! ```ignore
//! use kafkalite::config::EngineConfig;
//! use kafkalite::engine::LogEngine;
//!
//! let engine = LogEngine::open(EngineConfig::new("./topics"))?;
//! engine.create_topic("orders")?;
//! let id = engine.produce("orders", "hello")?;
//! for record in engine.consume_from("orders", id)? {
//!     println!("{}: {}", record?.id, "...");
//! }
//! ```

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod crash_point;
pub mod engine;
pub mod observability;
pub mod record;
pub mod topic;
