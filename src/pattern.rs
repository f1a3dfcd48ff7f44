//! Glob pattern matching for file discovery
//!
//! Patterns follow the usual globby conventions:
//!
//! - `*` matches within a single path segment, `**` matches across segments
//! - a leading `!` turns a pattern into an exclusion (`!**/*.d.ts`)
//! - `{a,b}` expands to one pattern per alternative, nesting allowed
//! - `**` inside a segment (`**.js`) behaves like `*`
//! - dotfiles are only matched by patterns that spell out the dot
//!
//! Ignore rules are plain patterns. An ignore rule ending in `/**` also prunes
//! the directory it names, so `**/node_modules/**` stops the scanner from
//! descending into any `node_modules` directory.

use std::path::{Component, Path};

use glob::{MatchOptions, Pattern, PatternError};

use crate::error::Error;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Compiled include, exclude and ignore patterns
#[derive(Debug, Clone, Default)]
pub struct GlobMatcher {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    ignore: Vec<Pattern>,
    ignore_dirs: Vec<Pattern>,
    hidden: bool,
}

impl GlobMatcher {
    /// Compile `pattern` (with `!` negations) and `ignore` rules
    pub fn new<P, I>(pattern: &[P], ignore: &[I]) -> Result<Self, Error>
    where
        P: AsRef<str>,
        I: AsRef<str>,
    {
        let mut matcher = Self::default();

        for raw in pattern {
            let raw = raw.as_ref();
            match raw.strip_prefix('!') {
                Some(negated) => matcher.exclude.extend(compile(raw, negated)?),
                None => {
                    let compiled = compile(raw, raw)?;
                    matcher.hidden |= compiled.iter().any(|p| names_hidden(p.as_str()));
                    matcher.include.extend(compiled);
                },
            }
        }

        for raw in ignore {
            let raw = raw.as_ref();
            for rule in expand_braces(raw).map_err(|source| invalid(raw, source))? {
                match rule.strip_suffix("/**") {
                    // A trailing `**` only matches directories, so the file
                    // form needs an explicit `/*`
                    Some(dir) => {
                        matcher.ignore.extend(compile(raw, &format!("{rule}/*"))?);
                        matcher.ignore_dirs.extend(compile(raw, dir)?);
                    },
                    None => matcher.ignore.extend(compile(raw, &rule)?),
                }
            }
        }

        Ok(matcher)
    }

    /// Whether some include pattern spells out a segment starting with `.`,
    /// so hidden entries can match
    #[must_use]
    pub const fn matches_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether there is no positive pattern to match against
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }

    /// Check a file path relative to the scan root
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        let path = to_slash(relative);

        self.include.iter().any(|p| p.matches_with(&path, MATCH_OPTIONS))
            && !self.exclude.iter().any(|p| p.matches_with(&path, MATCH_OPTIONS))
            && !self.is_ignored(relative)
    }

    /// Check whether a file relative to the scan root falls under an ignore rule
    #[must_use]
    pub fn is_ignored(&self, relative: &Path) -> bool {
        let path = to_slash(relative);
        self.ignore.iter().any(|p| p.matches_with(&path, MATCH_OPTIONS))
            || relative
                .ancestors()
                .skip(1)
                .filter(|a| !a.as_os_str().is_empty())
                .any(|a| self.is_ignored_dir(a))
    }

    /// Check whether a directory relative to the scan root is pruned
    #[must_use]
    pub fn is_ignored_dir(&self, relative: &Path) -> bool {
        let path = to_slash(relative);
        self.ignore_dirs.iter().any(|p| p.matches_with(&path, MATCH_OPTIONS))
    }
}

fn compile(raw: &str, body: &str) -> Result<Vec<Pattern>, Error> {
    expand_braces(body)
        .and_then(|bodies| {
            bodies
                .iter()
                .map(|body| Pattern::new(&normalize_pattern(body)))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|source| invalid(raw, source))
}

fn invalid(raw: &str, source: PatternError) -> Error {
    Error::InvalidPattern {
        pattern: raw.to_string(),
        source,
    }
}

fn names_hidden(pattern: &str) -> bool {
    pattern.split('/').any(|segment| segment.starts_with('.') && segment != "." && segment != "..")
}

/// Expand `{a,b}` alternatives into one pattern each.
///
/// Groups nest. A group without a top-level comma stays literal, as in
/// globby. Unbalanced braces are an error.
pub fn expand_braces(pattern: &str) -> Result<Vec<String>, PatternError> {
    let mut depth = 0_usize;
    let mut open = None;
    let mut commas = Vec::new();

    for (idx, c) in pattern.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    open = Some(idx);
                    commas.clear();
                }
                depth += 1;
            },
            '}' => {
                let Some(start) = open else {
                    return Err(PatternError {
                        pos: idx,
                        msg: "unmatched `}`",
                    });
                };
                depth -= 1;
                if depth > 0 {
                    continue;
                }
                if commas.is_empty() {
                    open = None;
                    continue;
                }

                commas.push(idx);
                let (head, tail) = (&pattern[..start], &pattern[idx + 1..]);
                let mut expanded = Vec::new();
                let mut from = start + 1;
                for &end in &commas {
                    let alternative = format!("{head}{}{tail}", &pattern[from..end]);
                    expanded.extend(expand_braces(&alternative)?);
                    from = end + 1;
                }
                return Ok(expanded);
            },
            ',' if depth == 1 => commas.push(idx),
            _ => {},
        }
    }

    match open {
        Some(pos) => Err(PatternError {
            pos,
            msg: "unmatched `{`",
        }),
        None => Ok(vec![pattern.to_string()]),
    }
}

/// Rewrite a globby-style pattern into one the `glob` crate accepts.
///
/// Strips a leading `./` and collapses any run of `*` inside a segment that
/// is not exactly `**`.
#[must_use]
pub fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.trim_start_matches("./");

    pattern
        .split('/')
        .map(|segment| {
            if segment == "**" || !segment.contains("**") {
                return segment.to_string();
            }
            let mut out = String::with_capacity(segment.len());
            for c in segment.chars() {
                if c == '*' && out.ends_with('*') {
                    continue;
                }
                out.push(c);
            }
            out
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Render a relative path with `/` separators for matching
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
