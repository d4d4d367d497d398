//! Engine configuration
//!
//! `EngineConfig` is an explicit value handed to `LogEngine::open`. The
//! engine never reads the environment itself; this module is the only place
//! that does.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. JSON config file (`EngineConfig::load`)
//! 3. Environment (`KAFKALITE_TOPIC_DIR`, `KAFKALITE_MIRROR_TEXT`)
//! 4. Explicit overrides from the caller (e.g. `--topics-dir`)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the topics root directory
pub const TOPIC_DIR_ENV: &str = "KAFKALITE_TOPIC_DIR";

/// Environment variable enabling the text mirror
pub const MIRROR_TEXT_ENV: &str = "KAFKALITE_MIRROR_TEXT";

/// Default topics root, relative to the working directory
pub const DEFAULT_TOPICS_DIR: &str = "./topics";

/// Placeholder recorded when no user can be determined
pub const UNKNOWN_USER: &str = "unknown";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid JSON for `EngineConfig`
    #[error("invalid config JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An environment variable has an unusable value
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    /// A field failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Root directory holding one subdirectory per topic
    pub topics_dir: PathBuf,

    /// fsync log appends and checkpoint rewrites
    pub fsync: bool,

    /// Maintain the human-readable `T/T.txt` mirror
    pub mirror_text: bool,

    /// Recorded in each new topic's meta file
    pub created_by: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            topics_dir: PathBuf::from(DEFAULT_TOPICS_DIR),
            fsync: true,
            mirror_text: false,
            created_by: UNKNOWN_USER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults rooted at `topics_dir`
    pub fn new(topics_dir: impl Into<PathBuf>) -> Self {
        Self {
            topics_dir: topics_dir.into(),
            ..Self::default()
        }
    }

    /// Load `config_file` (or start from defaults) and apply the process
    /// environment on top.
    pub fn from_env(config_file: Option<&Path>) -> ConfigResult<Self> {
        let base = match config_file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        base.apply_env(|key| std::env::var(key).ok())
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(TOPIC_DIR_ENV).filter(|d| !d.is_empty()) {
            self.topics_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(MIRROR_TEXT_ENV) {
            self.mirror_text = parse_bool(&raw).ok_or(ConfigError::InvalidEnv {
                var: MIRROR_TEXT_ENV,
                value: raw,
            })?;
        }

        if self.created_by == UNKNOWN_USER {
            if let Some(user) = lookup("USER")
                .or_else(|| lookup("USERNAME"))
                .filter(|u| !u.is_empty())
            {
                self.created_by = user;
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Override the topics root
    pub fn with_topics_dir(mut self, topics_dir: impl Into<PathBuf>) -> Self {
        self.topics_dir = topics_dir.into();
        self
    }

    /// Enable or disable fsync
    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Enable or disable the text mirror
    pub fn with_mirror_text(mut self, mirror_text: bool) -> Self {
        self.mirror_text = mirror_text;
        self
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.topics_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("topics_dir must not be empty".into()));
        }
        if self.created_by.contains('\n') {
            return Err(ConfigError::Invalid(
                "created_by must be a single line".into(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
