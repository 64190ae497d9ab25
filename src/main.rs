//! gitping - live terminal dashboard for Git Ping activity events

use std::process::ExitCode;

use anyhow::Result;
use gitping::{cli, config, output, run_loop};

fn main() -> ExitCode {
    match run() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = cli::Args::parse_args();
    let config = config::Config::from_args(args)?;

    let log_path = output::logger::init(config.verbose)?;
    if let Some(source) = &config.source {
        tracing::info!(path = %source.display(), "loaded config file");
    }
    tracing::debug!(log = %log_path.display(), "logging to file");

    match run_loop::run(config)? {
        run_loop::Outcome::Quit | run_loop::Outcome::Interrupted | run_loop::Outcome::Fetched => {
            Ok(ExitCode::SUCCESS)
        }
        run_loop::Outcome::FetchFailed => Ok(ExitCode::FAILURE),
    }
}
