//! tikzcd CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use tikzcd_cli::{Args, CliError, error_adapter::to_reportables};

/// Parses `--log-level`, falling back to `warn` on unknown names.
fn log_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {name}. Using 'warn' instead.");
        LevelFilter::Warn
    })
}

/// Logs every diagnostic of a failed conversion through miette.
fn report(err: &CliError) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(err) {
        let mut writer = String::new();
        match reporter.render_report(&mut writer, &reportable) {
            Ok(()) => error!("{writer}"),
            // Fall back to the plain message if the report cannot be drawn
            Err(_) => error!("{reportable}"),
        }
    }
}

fn main() {
    // Panics render as miette reports too
    miette::set_panic_hook();

    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level(&args.log_level))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"); "Starting tikzcd");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = tikzcd_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!("Conversion finished");
}
