//! CLI parse: clap types for tch-compare. No behavior; definitions only.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Compare two extracted Technicolor firmware images of the same board
#[derive(Parser, Debug)]
#[command(name = "tch-compare")]
#[command(about = "Report package and unpackaged file changes between two firmware versions")]
pub struct Cli {
    /// Top-level directory of the first converted firmware image
    pub first: PathBuf,

    /// Top-level directory of the second converted firmware image
    pub second: PathBuf,

    /// Reuse cached snapshots when they are complete and current
    #[arg(long, alias = "usecache")]
    pub use_cache: bool,

    /// Report packages whose installed size changed without a version change
    #[arg(long, alias = "incpkgsizechanged")]
    pub include_size_changes: bool,

    /// Record a diagnostic when two packages claim the same file
    #[arg(long)]
    pub warn_reassigned: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable coloured change markers
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
