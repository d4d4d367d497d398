//! Topic name to on-disk path mapping
//!
//! ```text
//! <root>/
//!   <topic>/
//!     <topic>.log    binary record stream (existence marker)
//!     <topic>.meta   checkpoint, key=value lines
//!     <topic>.txt    optional text mirror
//! ```

use std::path::{Path, PathBuf};

use super::errors::{TopicError, TopicResult};

/// Longest accepted topic name, in bytes
pub const MAX_TOPIC_NAME_LEN: usize = 255;

/// Resolved paths for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicLayout {
    name: String,
    dir: PathBuf,
    log_path: PathBuf,
    meta_path: PathBuf,
    mirror_path: PathBuf,
}

impl TopicLayout {
    /// Resolve the layout of `name` under `root`, validating the name.
    pub fn resolve(root: &Path, name: &str) -> TopicResult<Self> {
        validate_name(name)?;
        let dir = root.join(name);
        Ok(Self {
            name: name.to_string(),
            log_path: dir.join(format!("{}.log", name)),
            meta_path: dir.join(format!("{}.meta", name)),
            mirror_path: dir.join(format!("{}.txt", name)),
            dir,
        })
    }

    /// Topic name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Topic directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Binary log path
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Checkpoint path
    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    /// Text mirror path
    pub fn mirror_path(&self) -> &Path {
        &self.mirror_path
    }

    /// True iff the log file exists
    pub fn exists(&self) -> bool {
        self.log_path.is_file()
    }
}

/// Reject names that are empty, too long, path-like, or outside
/// `[A-Za-z0-9._-]`.
pub fn validate_name(name: &str) -> TopicResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.len() > MAX_TOPIC_NAME_LEN {
        Some("name is longer than 255 bytes")
    } else if name == "." || name == ".." {
        Some("name is a relative path component")
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        Some("only ASCII letters, digits, '-', '_' and '.' are allowed")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TopicError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
