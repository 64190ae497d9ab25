//! Connection status derived from the latest fetch attempt.

use std::fmt;

/// Presentational connection status.
///
/// Always derived from `(loading, error)`; never cached alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Loading,
    Error,
    Live,
}

impl ConnectionStatus {
    /// Loading takes precedence over error.
    pub fn derive(loading: bool, error: Option<&str>) -> Self {
        if loading {
            ConnectionStatus::Loading
        } else if error.is_some() {
            ConnectionStatus::Error
        } else {
            ConnectionStatus::Live
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Loading => "Loading...",
            ConnectionStatus::Error => "Connection Error",
            ConnectionStatus::Live => "Live",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
