//! HTTP client for the Git Ping events API.
//!
//! `EventsApi` is the seam between the polling controller and the network;
//! `HttpEventsApi` is the reqwest-backed implementation used at runtime.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::events::{Event, EventsResponse};

const GENERIC_FAILURE: &str = "Failed to fetch events";

/// Why a fetch attempt failed. Collapsed to its `Display` text once applied.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("{0}")]
    Application(String),
}

/// Result of one fetch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<Event>),
    Failure(String),
}

impl From<Result<Vec<Event>, FetchError>> for FetchOutcome {
    fn from(result: Result<Vec<Event>, FetchError>) -> Self {
        match result {
            Ok(events) => FetchOutcome::Success(events),
            Err(e) => FetchOutcome::Failure(e.to_string()),
        }
    }
}

/// Remote operations the dashboard depends on.
///
/// Futures are `?Send`: everything runs on one thread inside a `LocalSet`.
#[async_trait(?Send)]
pub trait EventsApi {
    /// `GET /events`.
    async fn fetch_events(&self) -> Result<Vec<Event>, FetchError>;

    /// `POST /events/sample`. Any 2xx is success; the body is ignored.
    async fn create_sample_events(&self) -> Result<(), FetchError>;
}

pub struct HttpEventsApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpEventsApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait(?Send)]
impl EventsApi for HttpEventsApi {
    async fn fetch_events(&self) -> Result<Vec<Event>, FetchError> {
        let url = format!("{}/events", self.base_url);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: EventsResponse = response.json().await.map_err(FetchError::Decode)?;
        if body.is_success() {
            Ok(body.into_events())
        } else {
            Err(FetchError::Application(
                body.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ))
        }
    }

    async fn create_sample_events(&self) -> Result<(), FetchError> {
        let url = format!("{}/events/sample", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(())
    }
}
