//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//!
//! ```rust
//! use clap::Parser;
//! use sessionpack::cli::{Args, OutputFormat};
//!
//! let args = Args::parse_from(["sessionpack", "campaign/", "-f", "json"]);
//! assert_eq!(args.format, OutputFormat::Json);
//! assert_eq!(args.export.to_str(), Some("./export"));
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Builds a session transcript and an omission report from FoundryVTT chat logs.
#[derive(Parser, Debug, Clone)]
#[command(name = "sessionpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    sessionpack
    sessionpack campaign/sessions -o campaign/export
    sessionpack sessions --config my.txt --actors cast.txt -f json
    RUST_LOG=sessionpack=debug sessionpack sessions")]
pub struct Args {
    /// Directory holding the session JSON files
    #[arg(default_value = "./sessions")]
    pub input: PathBuf,

    /// Directory the transcript is written to
    #[arg(short = 'o', long = "output", default_value = "./export")]
    pub export: PathBuf,

    /// KEY = VALUE configuration file (skipped if missing)
    #[arg(short, long, default_value = "./config/config.txt")]
    pub config: PathBuf,

    /// Speaker = player cast file (skipped if missing)
    #[arg(short, long, default_value = "./config/actors.txt")]
    pub actors: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// Overrides the TITLE configuration value
    #[arg(short, long)]
    pub title: Option<String>,

    /// Log every omitted message
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Readable Markdown document (default)
    #[default]
    #[value(alias = "md")]
    Markdown,

    /// One JSON document
    Json,

    /// JSON Lines - one row per block
    #[value(alias = "ndjson")]
    Jsonl,

    /// CSV with semicolon delimiter
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        crate::format::OutputFormat::from(*self).extension()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&crate::format::OutputFormat::from(*self), f)
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Markdown => crate::format::OutputFormat::Markdown,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
        }
    }
}
