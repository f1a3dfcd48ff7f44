//! Scan command - load directories with a built-in loader and report

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

use dirload::output::{OutputMode, ScanResult};
use dirload::{
    Config, DefaultKey, DirectoryLoader, DocumentLoader, ErrorPolicy, JsonLoader, LoadOptions,
    LoadReport, ModuleLoader, NameRule, SourceLoader, TomlLoader, Validation, paths,
};

use crate::cli::{Format, ScanArgs};

/// Load the requested directories and print what was loaded and skipped
pub fn scan(args: ScanArgs, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let (directories, options) = merge_options(config, &args);

    let base_dir = paths::resolve_base_dir(options.base_dir.as_deref())?;
    log::debug!("Base directory: {}", base_dir.display());

    let report = match args.format {
        Format::Document => run(DocumentLoader, options, &directories, args.unwrap_default),
        Format::Json => run(JsonLoader, options, &directories, args.unwrap_default),
        Format::Toml => run(TomlLoader, options, &directories, args.unwrap_default),
        Format::Source => {
            let source = |path: &Path| SourceLoader.load(path).map(Value::String);
            run(source, options, &directories, args.unwrap_default)
        },
    }
    .context("scan failed")?;

    ScanResult::from_report(&base_dir, report).render(output_mode);
    Ok(())
}

fn run<L>(
    loader: L,
    options: LoadOptions,
    directories: &[PathBuf],
    unwrap_default: bool,
) -> Result<LoadReport<Value>, dirload::Error>
where
    L: ModuleLoader<Value = Value>,
{
    let loader = DirectoryLoader::with_options(loader, options);
    if unwrap_default {
        loader.unwrap_with(DefaultKey).load_report(directories, |_, _, _| {})
    } else {
        loader.load_report(directories, |_, _, _| {})
    }
}

fn load_config(args: &ScanArgs) -> anyhow::Result<Option<Config>> {
    if let Some(path) = &args.config {
        let config = Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        return Ok(Some(config));
    }

    let dir = paths::resolve_base_dir(args.base_dir.as_deref())?;
    Ok(Config::discover(&dir)?)
}

/// Combine config file values with command-line flags; flags win
fn merge_options(
    config: Option<Config>,
    args: &ScanArgs,
) -> (Vec<PathBuf>, LoadOptions) {
    let (mut directories, mut options) = match config {
        Some(config) => (config.directories, config.options),
        None => (Vec::new(), format_defaults(args.format)),
    };

    if !args.directories.is_empty() {
        directories.clone_from(&args.directories);
    }
    if let Some(base) = &args.base_dir {
        options.base_dir = Some(base.clone());
    }
    if !args.pattern.is_empty() {
        options.pattern.clone_from(&args.pattern);
    }
    if !args.ignore.is_empty() {
        options.ignore.clone_from(&args.ignore);
    }
    if !args.extensions.is_empty() {
        options.allowed_extensions.clone_from(&args.extensions);
    }
    if args.fail_fast {
        options.policy = ErrorPolicy::FailFast;
    }
    if args.lenient {
        options.validation = Validation::Lenient;
    }
    if args.first_dot {
        options.name_rule = NameRule::FirstDot;
    }

    (directories, options)
}

const JSON_PATTERN: &[&str] = &["**/*.json"];
const JSON_EXTENSIONS: &[&str] = &["json"];
const TOML_PATTERN: &[&str] = &["**/*.toml"];
const TOML_EXTENSIONS: &[&str] = &["toml"];
const DOCUMENT_PATTERN: &[&str] = &["**/*.json", "**/*.toml", "**/*.js", "**/*.ts", "!**/*.d.ts"];
const DOCUMENT_EXTENSIONS: &[&str] = &["json", "toml", "js", "ts"];

/// Patterns and extensions that fit the chosen loader
fn format_defaults(format: Format) -> LoadOptions {
    let (pattern, extensions) = match format {
        Format::Source => (dirload::DEFAULT_PATTERN, dirload::DEFAULT_EXTENSIONS),
        Format::Json => (JSON_PATTERN, JSON_EXTENSIONS),
        Format::Toml => (TOML_PATTERN, TOML_EXTENSIONS),
        Format::Document => (DOCUMENT_PATTERN, DOCUMENT_EXTENSIONS),
    };

    LoadOptions {
        pattern: pattern.iter().map(ToString::to_string).collect(),
        allowed_extensions: extensions.iter().map(ToString::to_string).collect(),
        ..LoadOptions::default()
    }
}
