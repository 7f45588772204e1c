//! CLI argument definitions for the claims ingestion tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use claims_cli::logging::LogFormat;
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "claims",
    version,
    about = "Claims file ingestion - detect, map, validate and normalize carrier exports",
    long_about = "Ingest healthcare claims CSV exports.\n\n\
                  Detects the carrier layout, resolves a column mapping, validates\n\
                  rows and writes normalized claim records as JSON lines."
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

    /// Include raw cell values in trace logs (member ids, diagnosis codes).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Ingestion settings file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the known carrier formats.
    Carriers,

    /// Rank carrier formats for a CSV file.
    Detect(DetectArgs),

    /// Suggest a schema mapping for every column of a CSV file.
    Map(MapArgs),

    /// Parse a file and show the upload preview (detection, mapping, first issues).
    Preview(FileArgs),

    /// Validate a file and report data-quality issues.
    Validate(FileArgs),

    /// Validate, normalize and store a file's claims.
    Ingest(IngestArgs),
}

#[derive(Parser)]
pub struct DetectArgs {
    /// CSV file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the candidates as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct MapArgs {
    /// CSV file whose headers are mapped.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Target schema.
    #[arg(long = "schema", value_enum, default_value = "claims")]
    pub schema: SchemaArg,

    /// Saved preferences file, applied after the suggestions.
    #[arg(long = "preferences", value_name = "PATH")]
    pub preferences: Option<PathBuf>,

    /// Store the final assignments back into the preferences file.
    #[arg(long = "save-preferences", requires = "preferences")]
    pub save_preferences: bool,

    /// Assign a column to a field (SOURCE=FIELD; an empty FIELD clears).
    #[arg(long = "assign", value_name = "SOURCE=FIELD")]
    pub assign: Vec<String>,

    /// Print the mapping set as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct FileArgs {
    /// CSV file to process.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Confirmed field mapping (JSON object of field -> column).
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct IngestArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Write normalized claims as JSON lines (default: <FILE>.claims.jsonl).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Process the file in chunks instead of loading it at once.
    #[arg(long = "stream")]
    pub stream: bool,

    /// Rows per chunk in streaming mode (overrides the configuration).
    #[arg(long = "chunk-size", value_name = "ROWS", requires = "stream")]
    pub chunk_size: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    Claims,
    Experience,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
