//! Topic directory management
//!
//! Maps topic names to their on-disk layout and owns the create/delete
//! lifecycle of that layout. A topic exists iff its `.log` file exists.

mod errors;
mod layout;
mod manager;

pub use errors::{TopicError, TopicResult};
pub use layout::{validate_name, TopicLayout, MAX_TOPIC_NAME_LEN};
pub use manager::{CreateOutcome, DeleteOutcome, TopicManager};
