//! Dashboard session: wires the API client, controller and renderer together.

use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::LocalSet;
use tracing::info;

use crate::api::{EventsApi, HttpEventsApi};
use crate::config::Config;
use crate::controller::PollingController;
use crate::dashboard::Dashboard;
use crate::interrupt::Interrupt;
use crate::output::formatter;
use crate::sample::SampleDataTrigger;
use crate::ui;

/// How a dashboard session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user quit the full-screen UI.
    Quit,
    /// Ctrl+C in plain watch mode.
    Interrupted,
    /// `--once` fetch succeeded.
    Fetched,
    /// `--once` fetch failed.
    FetchFailed,
}

/// Run a dashboard session to completion on a single-threaded runtime.
pub fn run(config: Config) -> Result<Outcome> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    // The controller's state is `Rc<RefCell<..>>`; every task stays on this thread.
    let local = LocalSet::new();
    local.block_on(&runtime, run_session(config))
}

async fn run_session(config: Config) -> Result<Outcome> {
    let http = HttpEventsApi::new(&config.api_base, config.request_timeout)
        .context("Failed to build HTTP client")?;
    info!(
        api_base = %http.base_url(),
        interval_secs = config.poll_interval.as_secs(),
        polling = config.polling_enabled,
        "session configured"
    );
    let api: Rc<dyn EventsApi> = Rc::new(http);

    let controller = PollingController::new(Rc::clone(&api), config.poll_interval);
    controller.set_polling(config.polling_enabled);

    if config.once {
        return Ok(run_once(&controller).await);
    }

    let sample = SampleDataTrigger::new(api, controller.clone());
    let revisions = controller.subscribe();
    controller.start();

    let outcome = if ui::should_enable(config.ui_mode) {
        ui::app::run(&controller, &sample)
            .await
            .context("Terminal UI failed")?;
        Outcome::Quit
    } else {
        let ctrl_c = Interrupt::install()?;
        watch_plain(&controller, revisions, &ctrl_c).await
    };

    controller.shutdown();
    info!(?outcome, "session finished");
    Ok(outcome)
}

/// Single fetch, printed once.
pub async fn run_once(controller: &PollingController) -> Outcome {
    controller.fetch_once().await;
    let state = controller.snapshot();
    formatter::print_dashboard(&Dashboard::build(&state, Utc::now()));

    if state.error.is_some() {
        Outcome::FetchFailed
    } else {
        Outcome::Fetched
    }
}

/// Print a snapshot after every settled fetch until Ctrl+C.
async fn watch_plain(
    controller: &PollingController,
    mut revisions: watch::Receiver<u64>,
    ctrl_c: &Interrupt,
) -> Outcome {
    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    return Outcome::Quit;
                }
                let state = controller.snapshot();
                if !state.loading {
                    formatter::print_dashboard(&Dashboard::build(&state, Utc::now()));
                }
            }
            _ = ctrl_c.wait() => return Outcome::Interrupted,
        }
    }
}
