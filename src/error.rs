//! Error types for directory loading
//!
//! Every failure a load can produce maps onto one of four kinds (see
//! [`ErrorKind`]). Callers that only care about "misconfigured call" versus
//! "something on disk was broken" can match on [`Error::kind`] instead of the
//! individual variants.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Broad category of a load failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing arguments, or a file name that fails validation
    Validation,
    /// Path traversal outside the base directory
    Security,
    /// The module loader failed for a file
    Load,
    /// Scanning a directory failed, or the working directory is unavailable
    Scan,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Security => write!(f, "security"),
            Self::Load => write!(f, "load"),
            Self::Scan => write!(f, "scan"),
        }
    }
}

/// Errors returned by [`DirectoryLoader`](crate::DirectoryLoader)
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid top-level arguments
    #[error("invalid arguments: {0}")]
    Validation(String),

    /// Base directory is missing or not a directory
    #[error("base directory is not a directory: {0}")]
    BaseDir(PathBuf),

    /// A glob pattern failed to compile
    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern as given by the caller
        pattern: String,
        /// Underlying glob error
        #[source]
        source: glob::PatternError,
    },

    /// A matched file failed name or extension validation
    #[error("refusing to load {path}: {reason}")]
    InvalidFileName {
        /// Absolute path of the rejected file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// A directory argument tried to escape the base directory
    #[error("path traversal in `{input}`: {reason}")]
    Traversal {
        /// The directory argument as given
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// The module loader failed
    #[error("failed to load {path}: {source}")]
    Load {
        /// Absolute path of the file
        path: PathBuf,
        /// Loader error
        #[source]
        source: ModuleError,
    },

    /// Scanning a directory failed
    #[error("failed to scan {dir}: {source}")]
    Scan {
        /// Resolved directory
        dir: PathBuf,
        /// Scanner error
        #[source]
        source: ScanError,
    },

    /// Working directory could not be determined
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::BaseDir(_)
            | Self::InvalidPattern { .. }
            | Self::InvalidFileName { .. } => ErrorKind::Validation,
            Self::Traversal { .. } => ErrorKind::Security,
            Self::Load { .. } => ErrorKind::Load,
            // The working directory is part of the filesystem being scanned
            Self::Scan { .. } | Self::Io(_) => ErrorKind::Scan,
        }
    }

    /// Whether this error concerns a single file or directory rather than the
    /// call as a whole
    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        matches!(
            self,
            Self::Load { .. } | Self::Scan { .. } | Self::InvalidFileName { .. }
        )
    }
}

/// Errors raised by a [`ModuleLoader`](crate::module::ModuleLoader)
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Reading the file failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file content could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// The loader does not handle this file
    #[error("{0}")]
    Rejected(String),
}

impl ModuleError {
    /// Create a rejection error
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

impl From<serde_json::Error> for ModuleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ModuleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Errors raised by a [`Scanner`](crate::scanner::Scanner)
#[derive(Debug, Error)]
pub enum ScanError {
    /// Root path does not exist
    #[error("root path does not exist: {0}")]
    RootNotFound(PathBuf),

    /// Path is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Error walking directory tree
    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Some entries could not be read; the rest of the tree was scanned
    #[error("{} unreadable {}", .errors.len(), entries(.errors.len()))]
    Partial {
        /// Matches found in the readable part of the tree
        found: Vec<PathBuf>,
        /// One error per unreadable entry
        errors: Vec<walkdir::Error>,
    },
}

/// "entry" or "entries" for a count
pub(crate) const fn entries(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}
