//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::Parser;

/// Live terminal dashboard for Git Ping activity events.
///
/// Polls the Git Ping API for recent GitHub webhook events and shows them
/// with relative timestamps. Press `r` to refresh, `s` to create sample
/// events, `p` to pause polling and `q` to quit.
#[derive(Parser, Debug)]
#[command(name = "gitping", version, about, long_about = None)]
pub struct Args {
    /// Base URL of the Git Ping API (the `/events` endpoints live below it)
    #[arg(long, value_name = "URL", env = "GITPING_API_BASE")]
    pub api_base: Option<String>,

    /// Seconds between automatic refreshes
    #[arg(long, value_name = "SECS", env = "GITPING_INTERVAL")]
    pub interval: Option<u64>,

    /// Start with automatic polling disabled
    #[arg(long)]
    pub no_poll: bool,

    /// Fetch once, print the events and exit
    #[arg(short = 'o', long)]
    pub once: bool,

    /// Disable the full-screen dashboard and print plain text
    #[arg(long)]
    pub no_ui: bool,

    /// Path to a config file (defaults to the nearest .gitping.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
