//! Top-level application orchestration.
//!
//! `src/main.rs` only maps errors to exit codes; this module:
//! - parses CLI arguments and sets up logging
//! - loads the OMNIWeb file and selects the pre-onset window
//! - prints reports/plots

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, OutputArgs, RunArgs, ShowArgs, SynthArgs};
use crate::data::{SynthConfig, generate_dataset};
use crate::domain::{PrecondConfig, WindowSpec};
use crate::error::AppError;

pub mod pipeline;

/// Sample file shipped with the crate for `precond demo`.
pub const DEMO_DATA: &str = "data/omni_sample_july2000.lst";

/// Entry point for the `precond` binary.
pub fn run() -> Result<(), AppError> {
    // Bare `precond` runs the demo. Clap requires a subcommand name, so we
    // rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Demo(args) => handle_demo(args),
        Command::Show(args) => handle_show(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    execute(&config)
}

fn handle_demo(args: OutputArgs) -> Result<(), AppError> {
    let config = demo_config(&args)?;
    info!(path = %config.data_path.display(), "running bundled demo");
    execute(&config)
}

fn execute(config: &PrecondConfig) -> Result<(), AppError> {
    let run = pipeline::run_precond(config)?;

    println!("{}", crate::report::format_run_summary(&run.stats, &run.summary));

    if config.plot {
        let plot = crate::plot::render_window_plot(
            &run.window,
            config.plot_field,
            run.summary.result.get(config.plot_field),
            run.summary.onset,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let summary = crate::io::summary::read_summary_json(&args.summary)?;
    println!("Data: {}", summary.data_file);
    println!("{}", crate::report::format_summary(&summary));
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = SynthConfig {
        start: args.start,
        hours: args.hours,
        seed: args.seed,
        fill_prob: args.fill_prob,
        storm_hour: args.storm_hour,
    };
    let dataset = generate_dataset(&config)?;
    crate::io::omni::write_omni_file(&args.out, &dataset)?;
    info!(path = %args.out.display(), rows = dataset.len(), "wrote synthetic OMNI file");
    Ok(())
}

pub fn config_from_args(args: &RunArgs) -> PrecondConfig {
    let window = WindowSpec {
        span_hours: args.span_hours,
        convention: args.convention,
    };
    build_config(args.data.clone(), args.onset, window, &args.output)
}

/// Fixed smoke-test computation: the Bastille Day storm, 2000-07-15 13:00 UT.
pub fn demo_config(args: &OutputArgs) -> Result<PrecondConfig, AppError> {
    let onset = NaiveDate::from_ymd_opt(2000, 7, 15)
        .and_then(|d| d.and_hms_opt(13, 0, 0))
        .ok_or_else(|| AppError::new(4, "Invalid demo onset."))?;

    Ok(build_config(demo_data_path(), onset, WindowSpec::default(), args))
}

fn build_config(data_path: PathBuf, onset: NaiveDateTime, window: WindowSpec, args: &OutputArgs) -> PrecondConfig {
    PrecondConfig {
        data_path,
        onset,
        window,
        plot: args.plot,
        plot_field: args.field,
        plot_width: args.width,
        plot_height: args.height,
        export_window: args.export_window.clone(),
        export_summary: args.export_summary.clone(),
    }
}

/// Prefer the sample next to the working directory, else the one in the crate.
fn demo_data_path() -> PathBuf {
    let local = PathBuf::from(DEMO_DATA);
    if local.exists() {
        local
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEMO_DATA)
    }
}

/// Rewrite argv so `precond` defaults to `precond demo`.
///
/// Rules:
/// - `precond`                      -> `precond demo`
/// - `precond --plot ...`           -> `precond demo --plot ...`
/// - `precond --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("demo".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "demo" | "show" | "synth");
    if is_subcommand {
        return argv;
    }

    // A leading flag is treated as a demo flag.
    if arg1.starts_with('-') {
        argv.insert(1, "demo".to_string());
        return argv;
    }

    argv
}
