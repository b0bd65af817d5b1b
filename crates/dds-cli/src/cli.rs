//! CLI argument definitions for the data standardizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dds_model::{DEFAULT_THRESHOLD, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(
    name = "dds",
    version,
    about = "Dynamic Data Standardizer - map battery cycling columns to a canonical schema",
    long_about = "Map heterogeneous battery cycling data columns to canonical fields.\n\n\
                  Reads CSV, TSV and delimited text, scores every column against the\n\
                  canonical battery schema and writes a standardized cell record."
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
    /// Standardize a data file and write the cell record as JSON.
    Standardize(StandardizeArgs),

    /// Show the best canonical fields for every column of a data file.
    Suggest(SuggestArgs),

    /// List the canonical fields and their synonyms.
    Fields,
}

#[derive(Parser)]
pub struct StandardizeArgs {
    /// Input data file (.csv, .tsv or .txt).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path of the cell record JSON to write.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Cell identifier (default: input file stem).
    #[arg(long = "cell-id", value_name = "ID")]
    pub cell_id: Option<String>,

    /// Minimum similarity score for an automatic mapping.
    #[arg(long = "threshold", value_name = "T", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// JSON file mapping column names to canonical field keys.
    #[arg(long = "mapping", value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Map every column to its best available field, ignoring the threshold.
    #[arg(long = "force-all")]
    pub force_all: bool,

    /// Number of candidate fields shown per column.
    #[arg(long = "top-k", value_name = "K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Print the mapping report without writing the record.
    #[arg(long = "report-only")]
    pub report_only: bool,

    /// Print the top candidate fields for every column.
    #[arg(long = "suggestions")]
    pub suggestions: bool,

    /// Write mapping_report.txt next to OUTPUT.
    #[arg(long = "save-report")]
    pub save_report: bool,

    /// Also write the full standardization result as JSON.
    #[arg(long = "result-json", value_name = "FILE")]
    pub result_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SuggestArgs {
    /// Input data file (.csv, .tsv or .txt).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of candidate fields shown per column.
    #[arg(long = "top-k", value_name = "K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardize_defaults() {
        let cli = Cli::try_parse_from(["dds", "standardize", "in.csv", "out.json"]).unwrap();
        let Command::Standardize(args) = cli.command else {
            panic!("expected standardize");
        };
        assert_eq!(args.threshold, DEFAULT_THRESHOLD);
        assert_eq!(args.top_k, DEFAULT_TOP_K);
        assert!(args.cell_id.is_none());
        assert!(!args.force_all);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dds",
            "suggest",
            "in.csv",
            "--top-k",
            "5",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.verbosity.is_present());
        let Command::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.top_k, 5);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
