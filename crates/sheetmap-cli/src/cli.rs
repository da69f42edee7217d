//! CLI argument definitions for the sheet field mapper.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sheetmap_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "sheetmap",
    version,
    about = "Map spreadsheet columns to collection fields",
    long_about = "Map the columns of a tabular data source to the fields of a managed collection.\n\n\
                  Infers field types from the first data row, keeps the choices of earlier syncs,\n\
                  and emits the sync payload as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the inferred field of every column of a CSV file.
    Infer(InferArgs),

    /// Build the sync payload for a CSV file.
    Map(MapArgs),

    /// List or delete persisted contexts.
    Contexts(ContextsArgs),
}

#[derive(Parser)]
pub struct SourceArgs {
    /// Path to the CSV data source.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Field delimiter.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,
}

#[derive(Parser)]
pub struct InferArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser)]
pub struct MapArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Data source id (default: CSV file stem).
    #[arg(long = "source-id", value_name = "ID")]
    pub source_id: Option<String>,

    /// Directory of persisted contexts.
    #[arg(long = "repo", value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Explicit context JSON file (overrides --repo lookup).
    #[arg(long = "context", value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// JSON list of the collection's current fields, for change detection.
    #[arg(long = "host-fields", value_name = "FILE")]
    pub host_fields: Option<PathBuf>,

    /// Disable a column.
    #[arg(long = "disable", value_name = "ID")]
    pub disable: Vec<String>,

    /// Enable a column.
    #[arg(long = "enable", value_name = "ID")]
    pub enable: Vec<String>,

    /// Rename a column's field.
    #[arg(long = "rename", value_name = "ID=NAME")]
    pub rename: Vec<String>,

    /// Change a column's field type.
    #[arg(long = "retype", value_name = "ID=TYPE")]
    pub retype: Vec<String>,

    /// Choose the slug field.
    #[arg(long = "slug", value_name = "ID")]
    pub slug: Option<String>,

    /// Write the payload to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Record the sync in the --repo directory.
    #[arg(long = "save")]
    pub save: bool,
}

#[derive(Parser)]
pub struct ContextsArgs {
    /// Directory of persisted contexts.
    #[arg(long = "repo", value_name = "DIR")]
    pub repo: PathBuf,

    /// Delete the context of this data source instead of listing.
    #[arg(long = "delete", value_name = "ID")]
    pub delete: Option<String>,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
