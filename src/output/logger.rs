//! File-backed diagnostic logging.
//!
//! The dashboard owns the terminal, so `tracing` output goes to a per-run
//! log file instead of stderr.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber writing to a fresh log file.
///
/// `RUST_LOG` overrides the default level (`info`, or `debug` when verbose).
/// Returns the log file path.
pub fn init(verbose: bool) -> Result<PathBuf> {
    let log_path = setup_log_file(&log_directory())?;
    let file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file '{}'", log_path.display()))?;

    let default_level = if verbose { "gitping=debug" } else { "gitping=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gitping starting");
    Ok(log_path)
}

/// Set up the log directory and return the log file path.
pub fn setup_log_file(log_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;

    let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    Ok(log_dir.join(format!("{}.log", timestamp)))
}

/// Get the log directory path.
pub fn log_directory() -> PathBuf {
    let base_dir = env::var("TMPDIR")
        .or_else(|_| env::var("XDG_RUNTIME_DIR"))
        .unwrap_or_else(|_| "/tmp".to_string());

    PathBuf::from(base_dir).join("gitping").join("logs")
}
