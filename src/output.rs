//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorKind, entries};
use crate::loader::LoadReport;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a scan
#[derive(Debug, Serialize)]
pub struct ScanResult {
    /// Resolved base directory
    pub base_dir: String,
    /// Loaded modules in load order
    pub loaded: Vec<LoadedModule>,
    /// Files and directories that were skipped
    pub skipped: Vec<SkippedEntry>,
}

/// A loaded module
#[derive(Debug, Serialize)]
pub struct LoadedModule {
    /// Logical name
    pub name: String,
    /// Absolute path
    pub path: String,
    /// Short description of the loaded value
    pub summary: String,
    /// The loaded value itself
    pub target: Value,
}

/// A skipped file or directory
#[derive(Debug, Serialize)]
pub struct SkippedEntry {
    /// File or directory path
    pub path: String,
    /// Failure category
    pub kind: ErrorKind,
    /// Error message
    pub message: String,
}

impl ScanResult {
    /// Build from a load report
    #[must_use]
    pub fn from_report(base_dir: &Path, report: LoadReport<Value>) -> Self {
        let loaded = report
            .results
            .into_iter()
            .map(|r| LoadedModule {
                name: r.name,
                path: r.path.display().to_string(),
                summary: summarize(&r.target),
                target: r.target,
            })
            .collect();

        let skipped = report
            .failures
            .into_iter()
            .map(|f| SkippedEntry {
                path: f.path.display().to_string(),
                kind: f.kind,
                message: f.message,
            })
            .collect();

        Self {
            base_dir: base_dir.display().to_string(),
            loaded,
            skipped,
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if self.loaded.is_empty() {
            println!("No modules loaded from {}.", self.base_dir);
        } else {
            println!("Loaded {} module(s) from {}:\n", self.loaded.len(), self.base_dir);
            let width = self.loaded.iter().map(|m| m.name.len()).max().unwrap_or(0);
            for m in &self.loaded {
                println!("  {:width$}  {}", m.name, m.path);
                println!("  {:width$}  {}", "", m.summary);
            }
        }

        if !self.skipped.is_empty() {
            let count = self.skipped.len();
            println!("\nSkipped {count} {}:", entries(count));
            for s in &self.skipped {
                println!("  [{}] {}", s.kind, s.path);
                println!("          {}", s.message);
            }
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Describe a loaded value in a few words
#[must_use]
pub fn summarize(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("text, {} line(s)", s.lines().count()),
        Value::Array(items) => format!("array, {} item(s)", items.len()),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).take(5).collect();
            let more = if map.len() > keys.len() { ", ..." } else { "" };
            format!("object {{{}{more}}}", keys.join(", "))
        },
    }
}
