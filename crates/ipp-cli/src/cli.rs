//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ipp-merge-tables",
    version,
    about = "Merge IPP tax and benefit tables into a parameter tree",
    long_about = "Turn the YAML export of the IPP tax and benefit tables into dated \
                  parameters, merge them with an existing parameter tree and flag every \
                  baseline value the tables do not reproduce.\n\n\
                  Writes one XML file per top-level parameter group."
)]
pub struct Cli {
    /// Directory holding the YAML source tables.
    #[arg(long = "source-dir", value_name = "DIR")]
    pub source_dir: PathBuf,

    /// Baseline parameter XML document.
    #[arg(long = "baseline", value_name = "FILE")]
    pub baseline: PathBuf,

    /// YAML file relocating baseline paths before the merge.
    #[arg(long = "rewrites", value_name = "FILE")]
    pub rewrites: Option<PathBuf>,

    /// Directory receiving the merged parameter files.
    #[arg(long = "target", value_name = "DIR")]
    pub target: PathBuf,

    /// TOML file overriding the source-table vocabulary.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run the whole merge and print the summary without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the run summary and diagnostics as JSON.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
