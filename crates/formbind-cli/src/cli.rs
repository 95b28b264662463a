//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "formbind",
    version,
    about = "Normalize report exports and resolve field mappings against them",
    long_about = "Normalize business-intelligence report exports (markup or JSON) into \
                  ranked tabular datasets, and resolve field-mapping configurations \
                  against the result.\n\n\
                  Path commands inspect and edit arbitrary JSON or markup documents \
                  with dotted path expressions such as `series.0.name`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file with a `[normalize]` table.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

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
    /// Normalize a report export or backend payload.
    Normalize(NormalizeArgs),

    /// Resolve a mapping configuration against a normalized source.
    Resolve(ResolveArgs),

    /// Inspect or edit a document with path expressions.
    #[command(subcommand)]
    Path(PathCommand),
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// Report export (.xml or .json) or backend payload (.json).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Emit the FormStructure lookup and column labels instead of the dataset.
    #[arg(long = "form")]
    pub form: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Mapping configuration (JSON object keyed by output property).
    #[arg(long = "mapping", value_name = "JSON")]
    pub mapping: PathBuf,

    /// Report export, backend payload, or transformed `FormStructure` data to
    /// resolve against.
    #[arg(long = "data", value_name = "FILE")]
    pub data: PathBuf,

    /// Base properties (JSON object) that unresolved fields keep.
    #[arg(long = "base", value_name = "JSON")]
    pub base: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PathCommand {
    /// Print the value at a path.
    Get(PathTarget),

    /// Print the document with a value written at a path.
    Set {
        #[command(flatten)]
        target: PathTarget,

        /// Value to write; parsed as JSON, or taken as a string if it is not JSON.
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Print the document with the value at a path removed.
    Delete(PathTarget),

    /// List every node, or the nodes matching a value or kind.
    Find(FindArgs),
}

#[derive(Args)]
pub struct PathTarget {
    /// JSON or markup document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Dotted path expression, e.g. `series.0.name`.
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(Args)]
pub struct FindArgs {
    /// JSON or markup document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Match leaves against this value (parsed as JSON, or a string).
    #[arg(long = "value", value_name = "VALUE", conflicts_with = "kind")]
    pub value: Option<String>,

    /// Require exact equality instead of case-insensitive substring matching.
    #[arg(long = "exact", requires = "value")]
    pub exact: bool,

    /// Match nodes of this kind.
    #[arg(long = "kind", value_enum)]
    pub kind: Option<NodeKindArg>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum NodeKindArg {
    Array,
    Object,
    String,
    Number,
    Boolean,
    Null,
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
