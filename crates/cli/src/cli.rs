//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// LESS Seg - event detection and segmentation of vertical jump trials
#[derive(Parser, Debug)]
#[command(
    name = "less-seg",
    author,
    version,
    about = "IMU vertical jump event detection and segmentation",
    long_about = "Segments vertical jump trials recorded with ankle and pelvis IMUs.\n\n\
                  Groups per-sensor recordings into trials, conditions the signals, \n\
                  detects take-off, initial contact and knee flexion, and writes \n\
                  combined segment files plus a feature table."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LESS_SEG_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LESS_SEG_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Segment every trial of a recording directory
    Run(RunArgs),

    /// List the trials of a recording directory without processing them
    Scan(ScanArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "LESS_SEG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the sensor recordings
    #[arg(short, long, default_value = ".", env = "LESS_SEG_INPUT")]
    pub input: PathBuf,

    /// Override the output directory from configuration
    #[arg(short, long, env = "LESS_SEG_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Skip alignment, cropping and filtering
    #[arg(long)]
    pub no_conditioning: bool,

    /// Also write the conditioned streams under `<output>/conditioned`
    #[arg(long)]
    pub write_conditioned: bool,

    /// Write a Prometheus text snapshot of the run metrics to this file
    #[arg(long, env = "LESS_SEG_METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,

    /// Validate configuration and exit without processing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `scan` command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Path to configuration file (device serials are taken from it)
    #[arg(short, long, env = "LESS_SEG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the sensor recordings
    #[arg(short, long, default_value = ".", env = "LESS_SEG_INPUT")]
    pub input: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml", env = "LESS_SEG_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; defaults apply when omitted
    #[arg(short, long, env = "LESS_SEG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the configuration as TOML
    #[arg(long, conflicts_with = "json")]
    pub toml: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
