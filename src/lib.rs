//! dirload - discover files by glob pattern and load each one through a
//! pluggable module loader
//!
//! This library lets a host application auto-register files (route handlers,
//! plugins, fixture documents) without a hand-written import list. A
//! [`DirectoryLoader`] resolves each directory against a base directory,
//! rejects path traversal, scans for glob matches, loads every match through
//! a [`ModuleLoader`] and returns the results in a stable order.
//!
//! # Examples
//!
//! ```no_run
//! use dirload::{DirectoryLoader, ErrorPolicy, JsonLoader};
//!
//! let routes = DirectoryLoader::new(JsonLoader)
//!     .base_dir("/srv/app")
//!     .pattern(["**/*.json"])
//!     .allowed_extensions(["json"])
//!     .policy(ErrorPolicy::FailFast)
//!     .load(["routes"])
//!     .unwrap();
//! ```

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod loader;
pub mod module;
pub mod output;
pub mod paths;
pub mod pattern;
pub mod scanner;

pub use config::{Config, ErrorPolicy, LoadOptions, Validation};
pub use error::{Error, ErrorKind, ModuleError, ScanError};
pub use loader::{
    DEFAULT_EXTENSIONS, DEFAULT_IGNORE, DEFAULT_PATTERN, DirectoryLoader, LoadFailure, LoadReport,
    LoadResult, load,
};
pub use module::{
    DefaultKey, DocumentLoader, ExportUnwrap, JsonLoader, ModuleLoader, NoUnwrap, SourceLoader,
    TomlLoader,
};
pub use paths::NameRule;
pub use pattern::GlobMatcher;
pub use scanner::{Scanner, WalkScanner};
