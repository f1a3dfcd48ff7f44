//! DirectoryLoader - scan directories and load every matching file
//!
//! A load runs in two phases. First every directory argument is resolved
//! against the base directory and checked for traversal, so a bad argument
//! fails the call before anything is scanned. Then each directory is scanned
//! in order and each match is validated, loaded, unwrapped, reported to the
//! callback and collected.
//!
//! Failures of a single directory or file are handled according to
//! [`ErrorPolicy`]: fail fast, or log, record and skip.
//!
//! # Examples
//!
//! ```no_run
//! use dirload::{DirectoryLoader, SourceLoader};
//!
//! let loader = DirectoryLoader::new(SourceLoader)
//!     .base_dir("/srv/app")
//!     .pattern(["**/*.js"]);
//!
//! for module in loader.load(["routes", "plugins"]).unwrap() {
//!     println!("{} -> {}", module.name, module.path.display());
//! }
//! ```

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use crate::config::{ErrorPolicy, LoadOptions, Validation};
use crate::error::{Error, ErrorKind, ScanError};
use crate::module::{ExportUnwrap, ModuleLoader, NoUnwrap};
use crate::paths::{self, NameRule};
use crate::pattern::GlobMatcher;
use crate::scanner::{Scanner, WalkScanner};

/// Default glob patterns: JS/TS files, excluding declaration files
pub const DEFAULT_PATTERN: &[&str] = &["**/**.js", "**/**.ts", "!**/**.d.ts"];

/// Default ignore rules
pub const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**", "**/logs/**", "**/static/**"];

/// Extensions accepted under strict validation unless configured otherwise
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "ts"];

/// One loaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadResult<T> {
    /// Logical name derived from the file name
    pub name: String,
    /// Absolute path of the file
    pub path: PathBuf,
    /// Value produced by the module loader
    pub target: T,
}

/// A file or directory skipped under [`ErrorPolicy::BestEffort`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// File or directory that failed
    pub path: PathBuf,
    /// Failure category
    pub kind: ErrorKind,
    /// Error message
    pub message: String,
}

/// Results plus everything that was skipped
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport<T> {
    /// Loaded files in discovery order
    pub results: Vec<LoadResult<T>>,
    /// Skipped files and directories in the order they failed
    pub failures: Vec<LoadFailure>,
}

impl<T> LoadReport<T> {
    const fn new() -> Self {
        Self {
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Whether nothing was skipped
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Scans directories and loads matching files
#[derive(Debug, Clone)]
pub struct DirectoryLoader<L, S = WalkScanner, U = NoUnwrap> {
    loader: L,
    scanner: S,
    unwrap: U,
    options: LoadOptions,
}

impl<L: ModuleLoader> DirectoryLoader<L> {
    /// Create a loader with default options
    pub fn new(loader: L) -> Self {
        Self::with_options(loader, LoadOptions::default())
    }

    /// Create a loader with the given options
    pub fn with_options(loader: L, options: LoadOptions) -> Self {
        Self {
            loader,
            scanner: WalkScanner::default(),
            unwrap: NoUnwrap,
            options,
        }
    }
}

impl<L, S, U> DirectoryLoader<L, S, U> {
    /// Replace the scanner
    pub fn scanner<S2: Scanner>(self, scanner: S2) -> DirectoryLoader<L, S2, U> {
        DirectoryLoader {
            loader: self.loader,
            scanner,
            unwrap: self.unwrap,
            options: self.options,
        }
    }

    /// Replace the default-export unwrap policy
    pub fn unwrap_with<U2>(self, unwrap: U2) -> DirectoryLoader<L, S, U2> {
        DirectoryLoader {
            loader: self.loader,
            scanner: self.scanner,
            unwrap,
            options: self.options,
        }
    }

    /// Set the base directory for relative directories
    #[must_use]
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.options.base_dir = Some(base_dir.into());
        self
    }

    /// Set the glob patterns
    #[must_use]
    pub fn pattern<I>(mut self, pattern: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.options.pattern = pattern.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ignore rules
    #[must_use]
    pub fn ignore<I>(mut self, ignore: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.options.ignore = ignore.into_iter().map(Into::into).collect();
        self
    }

    /// Set the extensions accepted under strict validation
    #[must_use]
    pub fn allowed_extensions<I>(mut self, extensions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.options.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the error policy
    #[must_use]
    pub const fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    /// Set the validation mode
    #[must_use]
    pub const fn validation(mut self, validation: Validation) -> Self {
        self.options.validation = validation;
        self
    }

    /// Set the logical name rule
    #[must_use]
    pub const fn name_rule(mut self, rule: NameRule) -> Self {
        self.options.name_rule = rule;
        self
    }

    /// Current options
    #[must_use]
    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }
}

impl<L, S, U> DirectoryLoader<L, S, U>
where
    L: ModuleLoader,
    S: Scanner,
    U: ExportUnwrap<L::Value>,
{
    /// Load every matching file under `directories`
    pub fn load<I>(&self, directories: I) -> Result<Vec<LoadResult<L::Value>>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        self.load_with(directories, |_: &str, _: &Path, _: &L::Value| {})
    }

    /// Load every matching file, calling `callback` with (name, path, value)
    /// for each one as it is loaded
    pub fn load_with<I, F>(
        &self,
        directories: I,
        callback: F,
    ) -> Result<Vec<LoadResult<L::Value>>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
        F: FnMut(&str, &Path, &L::Value),
    {
        Ok(self.load_report(directories, callback)?.results)
    }

    /// Load every matching file and report what was skipped
    pub fn load_report<I, F>(
        &self,
        directories: I,
        mut callback: F,
    ) -> Result<LoadReport<L::Value>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
        F: FnMut(&str, &Path, &L::Value),
    {
        let strict = self.options.validation == Validation::Strict;
        let mut report = LoadReport::new();

        let directories: Vec<PathBuf> =
            directories.into_iter().map(|d| d.as_ref().to_path_buf()).collect();
        if directories.is_empty() {
            if strict {
                return Err(Error::Validation("no directories given".to_string()));
            }
            return Ok(report);
        }

        let base = paths::resolve_base_dir(self.options.base_dir.as_deref())?;
        if strict {
            paths::ensure_dir(&base)?;
        }

        let matcher = GlobMatcher::new(&self.options.pattern, &self.options.ignore)?;
        if matcher.is_empty() {
            if strict {
                return Err(Error::Validation(
                    "pattern needs at least one non-negated glob".to_string(),
                ));
            }
            return Ok(report);
        }

        let resolved = directories
            .iter()
            .map(|dir| paths::resolve_dir(&base, dir, strict))
            .collect::<Result<Vec<_>, _>>()?;

        for dir in &resolved {
            debug!("Scanning {}", dir.display());

            let matches = match self.scanner.scan(dir, &matcher) {
                Ok(matches) => matches,
                Err(ScanError::Partial { found, errors }) => {
                    for err in errors {
                        let path = err.path().map_or_else(|| dir.clone(), Path::to_path_buf);
                        let err = Error::Scan {
                            dir: path.clone(),
                            source: ScanError::WalkDir(err),
                        };
                        self.isolate(err, &path, &mut report)?;
                    }
                    found
                },
                Err(source) => {
                    let err = Error::Scan {
                        dir: dir.clone(),
                        source,
                    };
                    self.isolate(err, dir, &mut report)?;
                    continue;
                },
            };
            debug!("{} match(es) in {}", matches.len(), dir.display());

            for relative in matches {
                let path = dir.join(&relative);
                if strict && !paths::normalize(&path).starts_with(dir) {
                    return Err(Error::Traversal {
                        input: relative.display().to_string(),
                        reason: format!("scanner match escapes {}", dir.display()),
                    });
                }

                match self.load_file(path.clone(), strict) {
                    Ok(result) => {
                        callback(&result.name, &result.path, &result.target);
                        report.results.push(result);
                    },
                    Err(err) => self.isolate(err, &path, &mut report)?,
                }
            }
        }

        Ok(report)
    }

    fn load_file(&self, path: PathBuf, strict: bool) -> Result<LoadResult<L::Value>, Error> {
        if strict {
            paths::validate_file(&path, &self.options.allowed_extensions)?;
        }

        let name = paths::logical_name(&path, self.options.name_rule);
        let target = match self.loader.load(&path) {
            Ok(target) => self.unwrap.apply(target),
            Err(source) => return Err(Error::Load { path, source }),
        };

        debug!("Loaded {name} from {}", path.display());
        Ok(LoadResult { name, path, target })
    }

    /// Apply the error policy to a per-file or per-directory failure
    fn isolate(
        &self,
        err: Error,
        path: &Path,
        report: &mut LoadReport<L::Value>,
    ) -> Result<(), Error> {
        if self.options.policy == ErrorPolicy::FailFast || !err.is_isolated() {
            return Err(err);
        }

        warn!("Skipping {}: {err}", path.display());
        report.failures.push(LoadFailure {
            path: path.to_path_buf(),
            kind: err.kind(),
            message: err.to_string(),
        });
        Ok(())
    }
}

/// Load every default-pattern match under `directories` with `loader`.
///
/// Shorthand for `DirectoryLoader::new(loader)` with an optional base
/// directory.
pub fn load<I, L>(
    directories: I,
    base_dir: Option<&Path>,
    loader: L,
) -> Result<Vec<LoadResult<L::Value>>, Error>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
    L: ModuleLoader,
{
    let mut dir_loader = DirectoryLoader::new(loader);
    if let Some(base) = base_dir {
        dir_loader = dir_loader.base_dir(base);
    }
    dir_loader.load(directories)
}
