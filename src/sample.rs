//! One-shot sample data seeding.

use std::rc::Rc;

use tracing::{info, warn};

use crate::api::EventsApi;
use crate::controller::PollingController;

/// Asks the server to create sample events, then refreshes the dashboard.
///
/// Seeding is best-effort: failures are logged and never touch the
/// dashboard's loading or error state.
#[derive(Clone)]
pub struct SampleDataTrigger {
    api: Rc<dyn EventsApi>,
    controller: PollingController,
}

impl SampleDataTrigger {
    pub fn new(api: Rc<dyn EventsApi>, controller: PollingController) -> Self {
        Self { api, controller }
    }

    /// Returns whether the seed request succeeded.
    pub async fn trigger(&self) -> bool {
        match self.api.create_sample_events().await {
            Ok(()) => {
                info!("sample events created");
                self.controller.refresh();
                true
            }
            Err(e) => {
                warn!(error = %e, "error creating sample events");
                false
            }
        }
    }

    /// Fire-and-forget variant for key handlers. Requires a `LocalSet`.
    pub fn spawn(&self) {
        let this = self.clone();
        tokio::task::spawn_local(async move {
            this.trigger().await;
        });
    }
}
