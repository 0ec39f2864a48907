/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// cmdtree: inspect and run declarative command trees.
#[derive(Debug, Parser)]
#[command(
    name = "cmdtree",
    about = "Inspect, parse, and run command trees declared in TOML or JSON",
    version,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// When rendered help and errors carry color codes.
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Log at debug level and print phase timings to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON array or object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Aligned table with headers (human-readable).
    Table,
    /// Qualified command path only, one per line.
    Path,
}

/// `--color` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ColorChoice {
    /// Color when the terminal supports it.
    #[default]
    Auto,
    Always,
    Never,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every command declared in a definition file.
    List(ListArgs),
    /// Parse an argv against a definition and print the result.
    Parse(ParseArgs),
    /// Print the rendered help for a command.
    Help(HelpArgs),
    /// Parse and dispatch an argv against a definition.
    Run(RunArgs),
}

/// Arguments for `cmdtree list`.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Definition file (.toml or .json).
    pub file: PathBuf,

    /// Output as nested tree instead of a flat list.
    #[arg(long)]
    pub tree: bool,
}

/// Arguments for `cmdtree parse`.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Definition file (.toml or .json).
    pub file: PathBuf,

    /// Arguments for the declared program, after `--`.
    #[arg(last = true, value_name = "ARGV")]
    pub argv: Vec<String>,
}

/// Arguments for `cmdtree help`.
#[derive(Debug, Parser)]
pub struct HelpArgs {
    /// Definition file (.toml or .json).
    pub file: PathBuf,

    /// Colon-delimited command path. Defaults to the root command.
    /// Example: "banana:plantain"
    pub path: Option<String>,
}

/// Arguments for `cmdtree run`.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Definition file (.toml or .json).
    pub file: PathBuf,

    /// Arguments for the declared program, after `--`.
    #[arg(last = true, value_name = "ARGV")]
    pub argv: Vec<String>,
}
