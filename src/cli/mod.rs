//! Command-line parsing for the storm preconditioning tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading/averaging code.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{Field, WindowConvention};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "precond",
    version,
    about = "Mean solar wind conditions in the hours before a geomagnetic storm (OMNIWeb hourly data)"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Average an OMNIWeb file over the window preceding a storm onset.
    Run(RunArgs),
    /// Run the bundled July 2000 example (Bastille Day storm).
    Demo(OutputArgs),
    /// Print a previously exported summary JSON.
    Show(ShowArgs),
    /// Write a synthetic OMNIWeb-format file.
    Synth(SynthArgs),
}

/// Options for a single computation.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// OMNIWeb hourly `.lst` file.
    #[arg(short, long, value_name = "FILE")]
    pub data: PathBuf,

    /// Storm onset (UT), e.g. `2000-07-15T13:00` or `2000-197T13:00`.
    #[arg(short, long, value_parser = parse_timestamp)]
    pub onset: NaiveDateTime,

    /// Window length in hours.
    #[arg(long, default_value_t = 24)]
    pub span_hours: u32,

    /// Whether the onset hour belongs to the window.
    #[arg(long, value_enum, default_value_t = WindowConvention::Preceding)]
    pub convention: WindowConvention,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Presentation and export options.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Render an ASCII plot of one field across the window.
    #[arg(long)]
    pub plot: bool,

    /// Field to plot.
    #[arg(long, value_enum, default_value_t = Field::B)]
    pub field: Field,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Export the window records to CSV.
    #[arg(long = "export-window", value_name = "CSV")]
    pub export_window: Option<PathBuf>,

    /// Export the summary (window + statistics) to JSON.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

/// Options for displaying a saved summary.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Summary JSON file produced by `precond run --export-summary`.
    #[arg(long, value_name = "JSON")]
    pub summary: PathBuf,
}

/// Options for synthetic data generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// Output `.lst` path.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,

    /// First hour of the series (UT).
    #[arg(long, value_parser = parse_timestamp)]
    pub start: NaiveDateTime,

    /// Number of hourly rows.
    #[arg(long, default_value_t = 72)]
    pub hours: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability of writing a fill value for any measurement.
    #[arg(long, default_value_t = 0.0)]
    pub fill_prob: f64,

    /// Hour offset (from `--start`) of a simulated storm onset.
    #[arg(long)]
    pub storm_hour: Option<usize>,
}

/// Parse a UT timestamp.
///
/// Calendar (`YYYY-MM-DD`) and day-of-year (`YYYY-DDD`) dates are accepted,
/// followed by `T` or a space and `HH`, `HH:MM` or `HH:MM:SS`.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    const FMTS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%jT%H:%M",
        "%Y-%j %H:%M",
    ];
    let s = s.trim();
    let candidates = [s.to_string(), format!("{s}:00")];
    for candidate in &candidates {
        for fmt in FMTS {
            if let Ok(t) = NaiveDateTime::parse_from_str(candidate, fmt) {
                return Ok(t);
            }
        }
    }
    Err(format!(
        "Invalid timestamp '{s}'. Expected YYYY-MM-DDTHH[:MM[:SS]] or YYYY-DDDTHH[:MM]."
    ))
}
