//! Claims ingestion CLI.

use clap::{ColorChoice, Parser};
use claims_cli::logging::{LogConfig, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command};
use crate::commands::{
    load_config, run_carriers, run_detect, run_ingest, run_map, run_preview, run_validate,
};
use crate::summary::{
    print_detection, print_ingest, print_mapping_set, print_preview, print_validation,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Runs the selected command; `Ok` carries the exit code.
///
/// 0 on success, 1 when the file was processed but failed validation
/// (nothing stored, error-severity issues, or an unusable preview).
fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    let registry = config.registry()?;
    let code = match &cli.command {
        Command::Carriers => {
            run_carriers(&registry);
            0
        }
        Command::Detect(args) => {
            let results = run_detect(args, &registry, &config)?;
            if !args.json {
                print_detection(&results);
            }
            0
        }
        Command::Map(args) => {
            let set = run_map(args)?;
            if !args.json {
                print_mapping_set(&set);
            }
            0
        }
        Command::Preview(args) => {
            let response = run_preview(args, &registry, &config)?;
            if !args.json {
                print_preview(&response);
            }
            if response.success { 0 } else { 1 }
        }
        Command::Validate(args) => {
            let report = run_validate(args, &registry, &config)?;
            if !args.json {
                print_validation(&report);
            }
            if report.result.has_errors() { 1 } else { 0 }
        }
        Command::Ingest(args) => {
            let report = run_ingest(args, &registry, &config)?;
            if !args.file.json {
                print_ingest(&report);
            }
            if report.is_stored() { 0 } else { 1 }
        }
    };
    Ok(code)
}

/// Logging settings from the global flags.
///
/// An explicit `--log-level` beats `-v`/`-q`; either one disables `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter,
        use_env_filter: !cli.verbosity.is_present() && cli.log_level.is_none(),
        with_ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        log_data: cli.log_data,
        ..LogConfig::default()
    }
}
