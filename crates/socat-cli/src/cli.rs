//! CLI argument definitions for the SOCAT sanity checker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "socat-check",
    version,
    about = "SOCAT sanity checker - merge cruise metadata and normalize data files",
    long_about = "Merge OME cruise metadata documents and normalize cruise data files.\n\n\
                  Conflicting metadata values are reported instead of overwritten.\n\
                  Data columns are converted to canonical units and calculated\n\
                  columns are filled from the record and cruise metadata."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge OME metadata documents and report conflicting values.
    Merge(MergeArgs),

    /// Normalize a cruise data file using a column configuration.
    Check(CheckArgs),

    /// List supported units per converter.
    Units,
}

#[derive(Parser)]
pub struct MergeArgs {
    /// Metadata documents, oldest first.
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Where to write the merged document.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Where to write conflict records when any are found.
    #[arg(long = "conflicts", value_name = "PATH")]
    pub conflicts: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Cruise data file (CSV with a header row).
    #[arg(value_name = "DATA_CSV")]
    pub data_file: PathBuf,

    /// JSON column configuration.
    #[arg(long = "columns", value_name = "JSON")]
    pub columns: PathBuf,

    /// OME metadata document used by calculated columns.
    #[arg(long = "metadata", value_name = "XML")]
    pub metadata: Option<PathBuf>,

    /// Where to write the normalized data.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Where to write the issue list as JSON.
    #[arg(long = "report", value_name = "JSON")]
    pub report: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
