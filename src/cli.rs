//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands;
use dirload::output::OutputMode;

/// dirload - Discover files by glob pattern and load them
#[derive(Parser, Debug)]
#[command(
    name = "dirload",
    version,
    about = "Discover files by glob pattern and load them",
    long_about = "Scan directories for files matching glob patterns and load each one.\n\n\
                  Directories are resolved against a base directory and checked for\n\
                  path traversal. Files that fail to load are reported and skipped\n\
                  unless --fail-fast is given."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan directories and load every matching file
    Scan(ScanArgs),

    /// Show version
    Version,
}

/// Built-in loader used by `scan`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Pick by extension: JSON, TOML, or plain text
    #[default]
    Document,
    /// File text
    Source,
    /// JSON documents
    Json,
    /// TOML documents
    Toml,
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScanArgs {
    /// Directories to scan (relative to the base directory or absolute)
    pub directories: Vec<PathBuf>,

    /// Base directory for relative directories (default: current directory)
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,

    /// Glob pattern, repeatable; prefix with ! to exclude
    #[arg(short, long)]
    pub pattern: Vec<String>,

    /// Glob pattern to ignore, repeatable
    #[arg(short, long)]
    pub ignore: Vec<String>,

    /// Allowed file extension under strict validation, repeatable
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// How matched files are loaded
    #[arg(short, long, value_enum, default_value_t)]
    pub format: Format,

    /// Abort on the first file or directory that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip argument, traversal and file name checks
    #[arg(long)]
    pub lenient: bool,

    /// Name modules by the text before the first dot instead of stripping
    /// only the final extension
    #[arg(long)]
    pub first_dot: bool,

    /// Unwrap `{"default": ...}` documents to their default member
    #[arg(long)]
    pub unwrap_default: bool,

    /// Config file (default: dirload.toml in the base directory, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Scan(args)) => commands::scan(args, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("dirload v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("dirload v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'dirload --help' for usage");
                println!("Run 'dirload scan <DIR>' to load a directory");
            }
            Ok(())
        },
    }
}
