//! Configuration loading and validation.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags (and their env vars), a `.gitping.toml` file, and built-in defaults.
//! The config file is found by walking up from the current directory, or
//! given explicitly with `--config`.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::cli::Args;
use crate::controller::DEFAULT_POLL_INTERVAL;
use crate::ui::UiMode;

pub const CONFIG_FILE_NAME: &str = ".gitping.toml";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Contents of `.gitping.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub polling: PollingSection,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PollingSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            enabled: true,
        }
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_true() -> bool {
    true
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub poll_interval: Duration,
    pub polling_enabled: bool,
    pub request_timeout: Option<Duration>,
    pub ui_mode: UiMode,
    pub once: bool,
    pub verbose: bool,
    /// Config file that was loaded, if any.
    pub source: Option<PathBuf>,
}

impl Config {
    /// Build config from CLI args, discovering a config file if none is given.
    pub fn from_args(args: Args) -> Result<Self> {
        let (file, source) = match &args.config {
            Some(path) => (load_file(path)?, Some(path.clone())),
            None => match discover(&env::current_dir()?)? {
                Some((path, file)) => (file, Some(path)),
                None => (FileConfig::default(), None),
            },
        };
        Self::merge(args, file, source)
    }

    fn merge(args: Args, file: FileConfig, source: Option<PathBuf>) -> Result<Self> {
        let api_base = args
            .api_base
            .or(file.api.base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        if api_base.is_empty() {
            bail!("API base URL must not be empty");
        }
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            bail!("API base URL '{}' must start with http:// or https://", api_base);
        }

        let interval_secs = args.interval.unwrap_or(file.polling.interval_secs);
        if interval_secs == 0 {
            bail!("polling interval must be at least 1 second");
        }

        let request_timeout = match file.api.timeout_secs {
            Some(0) => bail!("api.timeout_secs must be at least 1 second"),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            api_base,
            poll_interval: Duration::from_secs(interval_secs),
            polling_enabled: file.polling.enabled && !args.no_poll,
            request_timeout,
            ui_mode: if args.once {
                UiMode::Off
            } else {
                UiMode::resolve(args.no_ui)
            },
            once: args.once,
            verbose: args.verbose,
            source,
        })
    }
}

/// Walk up from `start` looking for `.gitping.toml`.
fn discover(start: &Path) -> Result<Option<(PathBuf, FileConfig)>> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            let config = load_file(&config_path)?;
            return Ok(Some((config_path, config)));
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}
