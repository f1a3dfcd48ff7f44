//! Load options and the `dirload.toml` configuration file
//!
//! [`LoadOptions`] carries everything a [`DirectoryLoader`](crate::DirectoryLoader)
//! needs besides the directories themselves. [`Config`] adds the directory
//! list so a whole load can be described in a file:
//!
//! ```toml
//! directories = ["routes", "plugins"]
//! pattern = ["**/*.json"]
//! policy = "fail_fast"
//! allowed_extensions = ["json"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::{DEFAULT_EXTENSIONS, DEFAULT_IGNORE, DEFAULT_PATTERN};
use crate::paths::NameRule;

/// Configuration filename looked up in the base directory
pub const CONFIG_FILE: &str = "dirload.toml";

/// Errors reading or writing a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the file
    #[error("failed to read {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has the wrong shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serializing the config failed
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// What to do when a single file or directory fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the whole load on the first failure
    FailFast,
    /// Log the failure, skip the file or directory, keep going
    #[default]
    BestEffort,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail_fast"),
            Self::BestEffort => write!(f, "best_effort"),
        }
    }
}

/// How strictly arguments and matched files are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Reject empty inputs, traversal, unknown extensions and unsafe names
    #[default]
    Strict,
    /// Accept anything and let the filesystem decide
    Lenient,
}

impl std::fmt::Display for Validation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

/// Options for a directory load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Base for relative directories (working directory when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Glob patterns, `!` prefix for exclusions
    #[serde(default = "default_pattern")]
    pub pattern: Vec<String>,
    /// Glob patterns that are never loaded
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    /// Per-file and per-directory failure handling
    #[serde(default)]
    pub policy: ErrorPolicy,
    /// Argument and file name checking
    #[serde(default)]
    pub validation: Validation,
    /// Extensions accepted under strict validation
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Logical name derivation
    #[serde(default)]
    pub name_rule: NameRule,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn default_pattern() -> Vec<String> {
    to_strings(DEFAULT_PATTERN)
}

fn default_ignore() -> Vec<String> {
    to_strings(DEFAULT_IGNORE)
}

fn default_extensions() -> Vec<String> {
    to_strings(DEFAULT_EXTENSIONS)
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            pattern: default_pattern(),
            ignore: default_ignore(),
            policy: ErrorPolicy::default(),
            validation: Validation::default(),
            allowed_extensions: default_extensions(),
            name_rule: NameRule::default(),
        }
    }
}

/// A complete load described in `dirload.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directories to scan, in order
    #[serde(default)]
    pub directories: Vec<PathBuf>,
    /// Everything else
    #[serde(flatten)]
    pub options: LoadOptions,
}

impl Config {
    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a file.
    ///
    /// A relative `base_dir` is taken relative to the file's directory; an
    /// unset one becomes that directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.options.base_dir = Some(match config.options.base_dir.take() {
            Some(base) if base.is_relative() => dir.join(base),
            Some(base) => base,
            None => dir.to_path_buf(),
        });
        Ok(config)
    }

    /// Load `dirload.toml` from `dir` if it exists
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            log::debug!("Using config {}", path.display());
            Self::from_file(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
