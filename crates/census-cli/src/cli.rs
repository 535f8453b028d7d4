//! CLI argument definitions for census-prep.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use census_model::{DEFAULT_TARGET_STATE, PipelineOptions};

#[derive(Parser)]
#[command(
    name = "census-prep",
    version,
    about = "Denormalize Census 2021 tables for one state",
    long_about = "Filter the Census 2021 population and long-term health condition tables \
                  to one state, derive the SA2/SA3/SA4 hierarchy, join every lookup and \
                  write analysis-ready Parquet plus a JSON lookup bundle."
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
    /// Run the full preprocessing pipeline.
    Run(RunArgs),

    /// List the expected source files and whether they exist.
    Sources(SourcesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory containing the source tables.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Output directory (default: <DATA_DIR>/processed).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// State code to keep.
    #[arg(long = "state", value_name = "CODE", default_value = DEFAULT_TARGET_STATE)]
    pub state: String,

    /// Also denormalize and write the population fact table.
    #[arg(long = "include-population")]
    pub include_population: bool,

    /// Run every stage and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions::new(&self.data_dir)
            .with_output_dir(self.output_dir.clone())
            .with_target_state(self.state.trim())
            .with_population(self.include_population)
            .with_dry_run(self.dry_run)
    }
}

#[derive(Parser)]
pub struct SourcesArgs {
    /// Directory containing the source tables.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,
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
