//! Full-screen terminal dashboard.
//!
//! The dashboard takes over the terminal only when both output streams are
//! terminals. In `auto` mode a `TERM=dumb` terminal also falls back to
//! plain snapshots; `GITPING_UI=on` overrides that check.

pub mod app;
pub mod event;
pub mod theme;
pub mod view;

use std::env;
use std::io::IsTerminal;

pub use event::UiAction;

/// How the user asked for the dashboard to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    On,
    Off,
}

impl UiMode {
    /// `--no-ui` wins over `GITPING_UI`.
    pub fn resolve(no_ui_flag: bool) -> Self {
        if no_ui_flag {
            return Self::Off;
        }
        env::var("GITPING_UI")
            .map(|raw| Self::parse(&raw))
            .unwrap_or(Self::Auto)
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Self::On,
            "0" | "false" | "off" | "no" => Self::Off,
            _ => Self::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TerminalCaps {
    stdout_tty: bool,
    stderr_tty: bool,
    dumb: bool,
}

impl TerminalCaps {
    fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stderr_tty: std::io::stderr().is_terminal(),
            dumb: env::var("TERM").is_ok_and(|term| term == "dumb"),
        }
    }
}

/// Whether the TUI should take over the terminal.
pub fn should_enable(mode: UiMode) -> bool {
    enabled_for(mode, TerminalCaps::detect())
}

fn enabled_for(mode: UiMode, caps: TerminalCaps) -> bool {
    let ttys = caps.stdout_tty && caps.stderr_tty;
    match mode {
        UiMode::Off => false,
        UiMode::On => ttys,
        UiMode::Auto => ttys && !caps.dumb,
    }
}
