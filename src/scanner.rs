//! Scanner - lists files under a directory that match a [`GlobMatcher`]
//!
//! The scanner is the glob engine of a load: given a root and compiled
//! patterns it returns matching paths relative to the root. [`WalkScanner`]
//! is the default and walks the tree with `walkdir`; hosts can plug in their
//! own [`Scanner`] (an index, a virtual filesystem, a fixed list in tests).
//!
//! Entries that cannot be read (a permission error, a symlink loop) do not
//! stop the walk. [`WalkScanner`] keeps going and returns
//! [`ScanError::Partial`] carrying both the matches and the entry errors.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScanError;
use crate::pattern::GlobMatcher;

/// Source of file matches for a directory
pub trait Scanner {
    /// List files under `root` matching `matcher`, relative to `root`.
    ///
    /// The returned order is the order files are loaded in.
    fn scan(&self, root: &Path, matcher: &GlobMatcher) -> Result<Vec<PathBuf>, ScanError>;
}

/// Filesystem scanner backed by `walkdir`
#[derive(Debug, Clone, Copy)]
pub struct WalkScanner {
    follow_links: bool,
}

impl Default for WalkScanner {
    fn default() -> Self {
        Self { follow_links: true }
    }
}

impl WalkScanner {
    /// Create a scanner that follows symlinks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether symlinked directories are descended into
    #[must_use]
    pub const fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Check if an entry is hidden (starts with .)
    fn is_hidden(entry: &walkdir::DirEntry) -> bool {
        entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
    }
}

impl Scanner for WalkScanner {
    fn scan(&self, root: &Path, matcher: &GlobMatcher) -> Result<Vec<PathBuf>, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut matches = Vec::new();
        let mut errors = Vec::new();
        let walker = WalkDir::new(root).follow_links(self.follow_links).into_iter();

        for entry in walker.filter_entry(|e| {
            // Don't filter the root directory itself
            if e.path() == root || !e.file_type().is_dir() {
                return true;
            }
            // Hidden directories can only hold matches for patterns that
            // spell out the dot
            if Self::is_hidden(e) && !matcher.matches_hidden() {
                return false;
            }
            let relative = e.path().strip_prefix(root).unwrap_or(e.path());
            !matcher.is_ignored_dir(relative)
        }) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    errors.push(err);
                    continue;
                },
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if matcher.matches(relative) {
                matches.push(relative.to_path_buf());
            }
        }

        // Sort for deterministic output
        matches.sort();
        if errors.is_empty() {
            Ok(matches)
        } else {
            Err(ScanError::Partial {
                found: matches,
                errors,
            })
        }
    }
}

impl<F> Scanner for F
where
    F: Fn(&Path, &GlobMatcher) -> Result<Vec<PathBuf>, ScanError>,
{
    fn scan(&self, root: &Path, matcher: &GlobMatcher) -> Result<Vec<PathBuf>, ScanError> {
        self(root, matcher)
    }
}
