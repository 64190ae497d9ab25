//! Activity event types as served by the Git Ping API.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Event identifier. The API emits either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{n}"),
            EventId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A single activity event (push, pull request, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub action: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Normalized category key used for styling.
    pub fn category(&self) -> String {
        category_for(&self.action)
    }
}

/// Lower-case the action and replace the first underscore with a hyphen.
///
/// Only the first occurrence is substituted: `"pull_request_review"` becomes
/// `"pull-request_review"`.
pub fn category_for(action: &str) -> String {
    action.to_lowercase().replacen('_', "-", 1)
}

/// Raw body of `GET /events`.
///
/// Events stay as raw JSON until `into_events`, so one malformed entry
/// cannot reject the rest of the batch.
#[derive(Debug, Deserialize)]
pub(crate) struct EventsResponse {
    pub status: Option<String>,
    pub events: Option<Vec<Value>>,
    pub error: Option<String>,
}

impl EventsResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Decode the event list, skipping entries that do not parse.
    pub fn into_events(self) -> Vec<Event> {
        self.events
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<Event>(raw) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed event");
                    None
                }
            })
            .collect()
    }
}

/// Parse an ISO-8601 instant.
///
/// Accepts RFC 3339 with an offset. Timestamps without an offset are read as
/// local wall-clock time.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}
