//! Module loading - turns a matched file into a value
//!
//! A [`ModuleLoader`] is handed the absolute path of every matched file and
//! returns whatever the host wants to register for it. The crate ships loaders
//! for plain source text and for JSON/TOML documents; anything else (a plugin
//! registry, a script engine, native libraries) plugs in through the trait or
//! a closure.
//!
//! After loading, an [`ExportUnwrap`] policy may replace the value with its
//! "default export". [`NoUnwrap`] leaves values alone; [`DefaultKey`] unwraps
//! a JSON object's `default` member, mirroring the ES module convention.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::ModuleError;

/// Loads the value exported by a file
pub trait ModuleLoader {
    /// Value produced for each file
    type Value;

    /// Load the file at `path` (always absolute)
    fn load(&self, path: &Path) -> Result<Self::Value, ModuleError>;
}

impl<F, T> ModuleLoader for F
where
    F: Fn(&Path) -> Result<T, ModuleError>,
{
    type Value = T;

    fn load(&self, path: &Path) -> Result<T, ModuleError> {
        self(path)
    }
}

/// Policy for unwrapping a loaded value to its default export
pub trait ExportUnwrap<T> {
    /// Whether `value` carries a default export
    fn has_default(&self, value: &T) -> bool;

    /// Extract the default export; only called when `has_default` is true
    fn get_default(&self, value: T) -> T;

    /// Apply the policy
    fn apply(&self, value: T) -> T {
        if self.has_default(&value) {
            self.get_default(value)
        } else {
            value
        }
    }
}

/// Leaves every value as loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUnwrap;

impl<T> ExportUnwrap<T> for NoUnwrap {
    fn has_default(&self, _value: &T) -> bool {
        false
    }

    fn get_default(&self, value: T) -> T {
        value
    }
}

/// Unwraps `{"default": ...}` objects to their `default` member
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKey;

impl ExportUnwrap<Value> for DefaultKey {
    fn has_default(&self, value: &Value) -> bool {
        value.as_object().is_some_and(|obj| obj.contains_key("default"))
    }

    fn get_default(&self, value: Value) -> Value {
        match value {
            Value::Object(mut obj) => obj.remove("default").unwrap_or(Value::Null),
            other => other,
        }
    }
}

/// Loads a file's text
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceLoader;

impl ModuleLoader for SourceLoader {
    type Value = String;

    fn load(&self, path: &Path) -> Result<String, ModuleError> {
        Ok(fs::read_to_string(path)?)
    }
}

/// Parses a file as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl ModuleLoader for JsonLoader {
    type Value = Value;

    fn load(&self, path: &Path) -> Result<Value, ModuleError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Parses a file as TOML, converted to a JSON value
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlLoader;

impl ModuleLoader for TomlLoader {
    type Value = Value;

    fn load(&self, path: &Path) -> Result<Value, ModuleError> {
        let content = fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&content)?;
        Ok(serde_json::to_value(table)?)
    }
}

/// Picks a document loader from the file extension
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl ModuleLoader for DocumentLoader {
    type Value = Value;

    fn load(&self, path: &Path) -> Result<Value, ModuleError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => JsonLoader.load(path),
            Some("toml") => TomlLoader.load(path),
            Some(_) | None => SourceLoader.load(path).map(Value::String),
        }
    }
}
