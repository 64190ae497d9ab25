//! Renderer-independent view model of the dashboard.
//!
//! `Dashboard::build` is a pure function of the client state and the
//! current time. Both the TUI and the plain-text renderer draw from it.

use chrono::{DateTime, Local, Utc};

use crate::controller::ClientState;
use crate::events::Event;
use crate::status::ConnectionStatus;
use crate::time_format;

pub const TITLE: &str = "Git Ping";
pub const SUBTITLE: &str = "Real-time GitHub Action Tracker";
pub const EMPTY_TITLE: &str = "No Events Yet";
pub const EMPTY_MESSAGE: &str = "Waiting for GitHub webhook events...";
pub const EMPTY_HINT: &str = "You can create sample events to test the interface.";

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub header: Header,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub status: ConnectionStatus,
    pub event_count: usize,
    /// Only set while the status is live.
    pub last_updated: Option<DateTime<Local>>,
    pub polling_enabled: bool,
}

impl Header {
    pub fn count_label(&self) -> String {
        count_label(self.event_count)
    }

    pub fn last_updated_label(&self) -> Option<String> {
        self.last_updated
            .map(|t| format!("Last updated: {}", t.format("%H:%M:%S")))
    }
}

/// Exactly one of these regions is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// First load still in flight.
    LoadingEmpty,
    /// Fetch failed and nothing has been loaded; offers a retry.
    ErrorEmpty { message: String },
    /// Live, but the server has no events.
    EmptyLive,
    Populated(Vec<EventRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub key: String,
    pub category: String,
    pub action: String,
    pub message: String,
    pub relative_time: String,
}

impl Dashboard {
    pub fn build(state: &ClientState, now: DateTime<Utc>) -> Self {
        let status = state.status();
        let events = state.events();
        let last_updated = match status {
            ConnectionStatus::Live => state.last_updated.map(|t| t.with_timezone(&Local)),
            _ => None,
        };

        Self {
            header: Header {
                status,
                event_count: events.len(),
                last_updated,
                polling_enabled: state.polling_enabled,
            },
            body: select_body(
                events,
                status,
                state.error.as_deref(),
                state.last_updated,
                now,
            ),
        }
    }
}

/// Pick the body region for the given events and status.
pub fn select_body(
    events: &[Event],
    status: ConnectionStatus,
    error: Option<&str>,
    last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Body {
    if !events.is_empty() {
        return Body::Populated(
            events
                .iter()
                .map(|event| EventRow {
                    key: event.id.to_string(),
                    category: event.category(),
                    action: event.action.clone(),
                    message: event.message.clone(),
                    relative_time: time_format::label(last_updated, now, event.timestamp),
                })
                .collect(),
        );
    }

    match status {
        ConnectionStatus::Loading => Body::LoadingEmpty,
        ConnectionStatus::Error => Body::ErrorEmpty {
            message: error.unwrap_or_default().to_string(),
        },
        ConnectionStatus::Live => Body::EmptyLive,
    }
}

pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 event".to_string()
    } else {
        format!("{n} events")
    }
}
