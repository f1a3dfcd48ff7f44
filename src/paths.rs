//! Path resolution and path safety
//!
//! All directory arguments pass through here before anything touches the
//! filesystem:
//!
//! - the base directory is made absolute (falling back to the working
//!   directory when none is given),
//! - scan directories are joined to the base and lexically normalized,
//! - strict mode rejects `..` and `~` segments and any relative directory
//!   that resolves outside the base.
//!
//! Normalization is purely lexical. Symlinks are not resolved, so a link
//! inside the base that points elsewhere is followed by the scanner as-is.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a file's logical name is derived from its base name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameRule {
    /// Strip the final extension: `archive.tar.js` becomes `archive.tar`
    #[default]
    FinalExtension,
    /// Keep everything before the first dot: `archive.tar.js` becomes `archive`
    FirstDot,
}

impl std::fmt::Display for NameRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FinalExtension => write!(f, "final_extension"),
            Self::FirstDot => write!(f, "first_dot"),
        }
    }
}

/// Resolve the base directory to an absolute, normalized path.
///
/// `None` and the empty path both mean the current working directory. A
/// relative base is taken relative to the working directory.
pub fn resolve_base_dir(base: Option<&Path>) -> Result<PathBuf, Error> {
    let base = match base {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => return Ok(normalize(&std::env::current_dir()?)),
    };

    if base.is_absolute() {
        Ok(normalize(base))
    } else {
        Ok(normalize(&std::env::current_dir()?.join(base)))
    }
}

/// Check that the base directory exists and is a directory.
pub fn ensure_dir(base: &Path) -> Result<(), Error> {
    if base.is_dir() {
        Ok(())
    } else {
        Err(Error::BaseDir(base.to_path_buf()))
    }
}

/// Lexically normalize a path.
///
/// Drops `.` components and folds `..` into the preceding component. A `..`
/// directly under the root stays at the root; leading `..` components of a
/// relative path are kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Reject directory arguments containing `..` or `~` segments.
pub fn check_traversal(input: &Path) -> Result<(), Error> {
    for component in input.components() {
        match component {
            Component::ParentDir => {
                return Err(traversal(input, "parent directory segment `..`"));
            },
            Component::Normal(segment) if segment.to_string_lossy().starts_with('~') => {
                return Err(traversal(input, "home directory segment `~`"));
            },
            _ => {},
        }
    }
    Ok(())
}

fn traversal(input: &Path, reason: &str) -> Error {
    Error::Traversal {
        input: input.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Resolve a scan directory against an already-resolved base.
///
/// Absolute directories are normalized as-is. Relative directories are
/// joined to `base`. With `strict` set, traversal segments are rejected and a
/// relative directory must stay under `base`.
pub fn resolve_dir(base: &Path, dir: &Path, strict: bool) -> Result<PathBuf, Error> {
    if strict {
        check_traversal(dir)?;
    }

    if dir.is_absolute() {
        return Ok(normalize(dir));
    }

    let resolved = normalize(&base.join(dir));
    if strict && !resolved.starts_with(base) {
        return Err(traversal(dir, "resolves outside the base directory"));
    }
    Ok(resolved)
}

/// Derive the logical name of a file.
#[must_use]
pub fn logical_name(path: &Path, rule: NameRule) -> String {
    match rule {
        NameRule::FinalExtension => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
        NameRule::FirstDot => {
            let name = file_name(path);
            // A leading dot belongs to the name, not to an extension
            name.char_indices()
                .skip(1)
                .find(|&(_, c)| c == '.')
                .map_or_else(|| name.clone(), |(idx, _)| name[..idx].to_string())
        },
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Validate a matched file before it is handed to the module loader.
///
/// The extension must be one of `allowed` (compared without the leading dot)
/// and the base name must not contain `..` or `~` or start with `.`.
pub fn validate_file(path: &Path, allowed: &[String]) -> Result<(), Error> {
    let reject = |reason: String| Error::InvalidFileName {
        path: path.to_path_buf(),
        reason,
    };

    let name = file_name(path);
    if name.contains("..") {
        return Err(reject("file name contains `..`".to_string()));
    }
    if name.contains('~') {
        return Err(reject("file name contains `~`".to_string()));
    }
    if name.starts_with('.') {
        return Err(reject("file name starts with `.`".to_string()));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !allowed.iter().any(|a| a.trim_start_matches('.') == ext) {
        return Err(reject(format!("extension `{ext}` is not allowed")));
    }

    Ok(())
}
