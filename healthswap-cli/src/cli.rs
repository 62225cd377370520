//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// HealthSwap -- product health scoring and healthier alternatives.
///
/// Use `healthswap <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "healthswap", version, about, long_about = None)]
pub struct Cli {
    /// Path to the healthswap.toml configuration file.
    ///
    /// When omitted, `healthswap.toml` in the current directory is used if present,
    /// otherwise built-in defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the health score of a product record.
    Score(ScoreArgs),

    /// Parse package size strings and compare two of them.
    Quantity(QuantityArgs),

    /// Show the catalog search terms derived from a product name.
    Terms(TermsArgs),

    /// Compare two product records side by side.
    Compare(CompareArgs),

    /// Find healthier alternatives for a product record.
    Alternatives(AlternativesArgs),

    /// Summarize the health trend of a scan history.
    Trend(TrendArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- score ----

/// Score a product record read from a JSON file.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Path to a product record JSON file.
    pub product: PathBuf,
}

// ---- quantity ----

/// Parse one package size, or compare two.
#[derive(Args, Debug)]
pub struct QuantityArgs {
    /// Package size text (e.g. "500 g", "12 fl oz", "6 x 330 ml").
    pub first: String,

    /// Second package size to compare against the first.
    pub second: Option<String>,
}

// ---- terms ----

/// Derive catalog search terms.
#[derive(Args, Debug)]
pub struct TermsArgs {
    /// Product name.
    pub name: String,

    /// Comma-separated category string (e.g. "en:breakfast-cereals,en:snacks").
    #[arg(long)]
    pub categories: Option<String>,
}

// ---- compare ----

/// Compare product A against product B.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Path to product A JSON file.
    pub a: PathBuf,

    /// Path to product B JSON file.
    pub b: PathBuf,
}

// ---- alternatives ----

/// Query the catalog for healthier alternatives.
#[derive(Args, Debug)]
pub struct AlternativesArgs {
    /// Path to a product record JSON file.
    pub product: PathBuf,

    /// Maximum number of alternatives (default: `ranking.max_results`).
    #[arg(long)]
    pub max_results: Option<usize>,
}

// ---- trend ----

/// Summarize a scan history file.
#[derive(Args, Debug)]
pub struct TrendArgs {
    /// Path to a JSON array of scan history entries.
    pub history: PathBuf,
}

// ---- config ----

/// Manage healthswap configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, catalog, ranking).
        #[arg(long)]
        section: Option<String>,
    },
}
