//! In-memory form of a topic's `.meta` file
//!
//! The file is a list of `key=value` lines. It is always loaded whole,
//! mutated, and rendered whole. Every line is kept exactly as read,
//! terminator included; only the line of a key that is `set` is rewritten.

use std::path::Path;

use super::errors::{CheckpointError, CheckpointResult};

/// Key holding the last assigned record id
pub const LAST_ID_KEY: &str = "last_message_id";

/// Key recording when the topic was created (RFC3339, UTC)
pub const CREATED_AT_KEY: &str = "created_at";

/// Key recording who created the topic
pub const CREATED_BY_KEY: &str = "created_by";

/// Raw lines of a meta file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaFile {
    lines: Vec<String>,
}

impl MetaFile {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse meta file content.
    ///
    /// Every non-blank line must hold a `=` with a non-empty key before it.
    /// Keys and values are compared and read trimmed, but the lines
    /// themselves are stored untouched.
    ///
    /// `path` is used for error context only.
    pub fn parse(path: &Path, text: &str) -> CheckpointResult<Self> {
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let (key, _) = line.split_once('=').ok_or_else(|| {
                CheckpointError::corrupt(
                    path,
                    format!("line {} is not a key=value pair: {:?}", line_no + 1, line),
                )
            })?;

            if key.trim().is_empty() {
                return Err(CheckpointError::corrupt(
                    path,
                    format!("line {} has an empty key", line_no + 1),
                ));
            }
        }

        Ok(Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        })
    }

    /// Returns the trimmed value for `key`; the last occurrence wins
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .filter_map(|line| split_entry(line))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Set `key` to `value`.
    ///
    /// The first line holding `key` is replaced (keeping its terminator) and
    /// later duplicates are dropped; if there is none, a line is appended.
    /// No other line is touched.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let mut replaced = false;

        self.lines.retain_mut(|line| {
            let matches = split_entry(line).map(|(k, _)| k == key).unwrap_or(false);
            if !matches {
                return true;
            }
            if replaced {
                return false;
            }
            let terminator = terminator(line);
            *line = format!("{}={}{}", key, value, terminator);
            replaced = true;
            true
        });

        if !replaced {
            if let Some(last) = self.lines.last_mut() {
                if !last.ends_with('\n') {
                    last.push('\n');
                }
            }
            self.lines.push(format!("{}={}\n", key, value));
        }
    }

    /// Parse the `last_message_id` value
    pub fn last_id(&self, path: &Path) -> CheckpointResult<u32> {
        let raw = self.get(LAST_ID_KEY).ok_or_else(|| {
            CheckpointError::corrupt(path, format!("missing key '{}'", LAST_ID_KEY))
        })?;

        raw.parse::<u32>().map_err(|e| {
            CheckpointError::corrupt(
                path,
                format!("'{}' value {:?} is not a u32: {}", LAST_ID_KEY, raw, e),
            )
        })
    }

    /// Render to file content
    pub fn render(&self) -> String {
        self.lines.concat()
    }
}

/// Trimmed `(key, value)` of an entry line; `None` for blank or malformed
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn terminator(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}
