//! Non-TUI output: plain-text rendering and diagnostic logging.

pub mod formatter;
pub mod logger;
