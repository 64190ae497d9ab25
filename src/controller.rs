//! Polling lifecycle and client state.
//!
//! `PollingController` owns the single `ClientState` of a dashboard session.
//! It issues one fetch on `start()`, then one per interval while polling is
//! enabled, and applies each settled outcome to the state.
//!
//! State is `Rc<RefCell<>>`, not `Arc<Mutex<>>`: the controller, its timer
//! and every fetch run on one thread via `tokio::task::LocalSet`. Methods
//! that spawn work must be called from inside a `LocalSet`.
//!
//! Overlapping fetches are never cancelled. Each attempt carries a
//! generation number and an outcome older than the newest applied one is
//! discarded, so the most recently issued request wins.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{EventsApi, FetchOutcome};
use crate::events::Event;
use crate::status::ConnectionStatus;
use crate::store::EventStore;

/// Default recurring fetch interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Mutable dashboard state.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub events: EventStore,
    /// True from construction until the first outcome, and after `refresh()`
    /// until its outcome settles.
    pub loading: bool,
    pub error: Option<String>,
    /// Wall-clock time of the last successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
    pub polling_enabled: bool,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            events: EventStore::new(),
            loading: true,
            error: None,
            last_updated: None,
            polling_enabled: true,
        }
    }
}

impl ClientState {
    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::derive(self.loading, self.error.as_deref())
    }

    pub fn events(&self) -> &[Event] {
        self.events.current()
    }

    /// Apply a settled outcome. `loading` is cleared on every path.
    pub fn apply(&mut self, outcome: FetchOutcome, now: DateTime<Utc>) {
        match outcome {
            FetchOutcome::Success(events) => {
                self.events.replace_all(events);
                self.error = None;
                // Never move the baseline backwards (clock skew).
                self.last_updated = Some(match self.last_updated {
                    Some(prev) if prev > now => prev,
                    _ => now,
                });
            }
            FetchOutcome::Failure(reason) => {
                self.error = Some(reason);
            }
        }
        self.loading = false;
    }
}

struct Inner {
    api: Rc<dyn EventsApi>,
    state: RefCell<ClientState>,
    interval: Duration,
    timer: RefCell<Option<JoinHandle<()>>>,
    started: Cell<bool>,
    /// Cleared on `shutdown()`; late outcomes become no-ops.
    attached: Cell<bool>,
    issued: Cell<u64>,
    applied: Cell<u64>,
    /// Bumped on every state change.
    revision: watch::Sender<u64>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

/// Cheap-to-clone handle to the polling lifecycle.
#[derive(Clone)]
pub struct PollingController {
    inner: Rc<Inner>,
}

impl PollingController {
    pub fn new(api: Rc<dyn EventsApi>, interval: Duration) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Rc::new(Inner {
                api,
                state: RefCell::new(ClientState::default()),
                interval,
                timer: RefCell::new(None),
                started: Cell::new(false),
                attached: Cell::new(true),
                issued: Cell::new(0),
                applied: Cell::new(0),
                revision,
            }),
        }
    }

    /// Clone of the current state for renderers.
    pub fn snapshot(&self) -> ClientState {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.state.borrow().status()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn polling_enabled(&self) -> bool {
        self.inner.state.borrow().polling_enabled
    }

    pub fn is_polling_armed(&self) -> bool {
        self.inner.timer.borrow().is_some()
    }

    /// Receiver that changes whenever the state does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Fetch immediately, then arm the recurring timer if polling is enabled.
    pub fn start(&self) {
        if !self.inner.attached.get() {
            return;
        }
        self.inner.started.set(true);
        info!("dashboard started");
        self.spawn_fetch();
        if self.polling_enabled() {
            self.arm();
        }
    }

    /// Disarm the recurring timer. In-flight fetches, including one the
    /// timer fired, still apply.
    pub fn stop(&self) {
        self.inner.started.set(false);
        self.disarm();
    }

    /// Manual refresh: shows loading right away, then fetches.
    pub fn refresh(&self) {
        if !self.inner.attached.get() {
            return;
        }
        self.inner.state.borrow_mut().loading = true;
        self.bump();
        self.spawn_fetch();
    }

    pub fn set_polling(&self, enabled: bool) {
        self.inner.state.borrow_mut().polling_enabled = enabled;
        self.bump();
        info!(enabled, "polling toggled");
        if !self.inner.started.get() || !self.inner.attached.get() {
            return;
        }
        if enabled {
            self.arm();
        } else {
            self.disarm();
        }
    }

    pub fn toggle_polling(&self) {
        self.set_polling(!self.polling_enabled());
    }

    /// Teardown: stop polling and ignore anything that settles afterwards.
    pub fn shutdown(&self) {
        self.inner.attached.set(false);
        self.stop();
        debug!("dashboard detached");
    }

    /// Run one fetch attempt to completion and apply its outcome.
    pub async fn fetch_once(&self) {
        let generation = self.inner.issued.get() + 1;
        self.inner.issued.set(generation);
        debug!(generation, "fetching events");

        let outcome = FetchOutcome::from(self.inner.api.fetch_events().await);
        self.settle(generation, outcome, Utc::now());
    }

    fn spawn_fetch(&self) {
        let this = self.clone();
        tokio::task::spawn_local(async move {
            this.fetch_once().await;
        });
    }

    fn settle(&self, generation: u64, outcome: FetchOutcome, now: DateTime<Utc>) {
        if !self.inner.attached.get() {
            debug!(generation, "outcome settled after shutdown, ignoring");
            return;
        }

        {
            let mut state = self.inner.state.borrow_mut();
            if generation < self.inner.applied.get() {
                debug!(
                    generation,
                    applied = self.inner.applied.get(),
                    "discarding stale outcome"
                );
                state.loading = false;
            } else {
                self.inner.applied.set(generation);
                match &outcome {
                    FetchOutcome::Success(events) => {
                        info!(generation, count = events.len(), "events fetched");
                    }
                    FetchOutcome::Failure(reason) => {
                        warn!(generation, %reason, "error fetching events");
                    }
                }
                state.apply(outcome, now);
            }
        }
        self.bump();
    }

    fn arm(&self) {
        let mut timer = self.inner.timer.borrow_mut();
        if timer.is_some() {
            return;
        }

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let period = self.inner.interval;
        *timer = Some(tokio::task::spawn_local(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let controller = PollingController { inner };
                if !controller.polling_enabled() {
                    continue;
                }
                // The fetch runs in its own task: aborting the timer while
                // it is awaited detaches it instead of cancelling it.
                let fetch = tokio::task::spawn_local(async move {
                    controller.fetch_once().await;
                });
                let _ = fetch.await;
            }
        }));
        info!(interval_secs = period.as_secs(), "polling armed");
    }

    fn disarm(&self) {
        if let Some(handle) = self.inner.timer.borrow_mut().take() {
            handle.abort();
            info!("polling disarmed");
        }
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{event, Reply, ScriptedApi};
    use super::*;
    use tokio::task::LocalSet;

    /// Helper macro: run an async block inside a LocalSet (required for spawn_local).
    macro_rules! with_local_set {
        ($body:expr) => {{
            let local = LocalSet::new();
            local.run_until($body).await;
        }};
    }

    fn controller(api: &Rc<ScriptedApi>) -> PollingController {
        PollingController::new(api.clone(), DEFAULT_POLL_INTERVAL)
    }

    async fn settle_idle() {
        // Paused clock: sleeping lets every ready local task run to completion.
        time::sleep(Duration::from_millis(1)).await;
    }

    #[test]
    fn initial_state_is_loading_and_empty() {
        let state = ClientState::default();
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.last_updated.is_none());
        assert!(state.polling_enabled);
        assert!(state.events().is_empty());
        assert_eq!(state.status(), ConnectionStatus::Loading);
    }

    #[test]
    fn apply_failure_keeps_events_and_baseline() {
        let mut state = ClientState::default();
        let first = Utc::now();
        state.apply(FetchOutcome::Success(vec![event(1, "push", 10)]), first);
        state.apply(FetchOutcome::Failure("down".to_string()), first + chrono::Duration::seconds(15));

        assert_eq!(state.events().len(), 1);
        assert_eq!(state.error.as_deref(), Some("down"));
        assert_eq!(state.last_updated, Some(first));
        assert!(!state.loading);
        assert_eq!(state.status(), ConnectionStatus::Error);
    }

    #[test]
    fn apply_success_clears_error() {
        let mut state = ClientState::default();
        state.apply(FetchOutcome::Failure("down".to_string()), Utc::now());
        state.apply(FetchOutcome::Success(Vec::new()), Utc::now());
        assert!(state.error.is_none());
        assert_eq!(state.status(), ConnectionStatus::Live);
    }

    #[test]
    fn last_updated_never_moves_backwards() {
        let mut state = ClientState::default();
        let later = Utc::now();
        state.apply(FetchOutcome::Success(Vec::new()), later);
        state.apply(
            FetchOutcome::Success(Vec::new()),
            later - chrono::Duration::seconds(30),
        );
        assert_eq!(state.last_updated, Some(later));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn start_fetches_immediately_and_then_every_interval() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;
            assert_eq!(api.fetch_calls.get(), 1);
            assert_eq!(ctl.status(), ConnectionStatus::Live);

            time::sleep(Duration::from_secs(15)).await;
            settle_idle().await;
            assert_eq!(api.fetch_calls.get(), 2);

            time::sleep(Duration::from_secs(15)).await;
            settle_idle().await;
            assert_eq!(api.fetch_calls.get(), 3);
            ctl.shutdown();
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn start_twice_arms_a_single_timer() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            let ctl = controller(&api);
            ctl.start();
            ctl.start();
            settle_idle().await;
            assert_eq!(api.fetch_calls.get(), 2);

            time::sleep(Duration::from_secs(15)).await;
            settle_idle().await;
            assert_eq!(api.fetch_calls.get(), 3);
            ctl.shutdown();
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn stop_disarms_timer_idempotently() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;
            assert!(ctl.is_polling_armed());

            ctl.stop();
            ctl.stop();
            assert!(!ctl.is_polling_armed());

            time::sleep(Duration::from_secs(60)).await;
            assert_eq!(api.fetch_calls.get(), 1);
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn in_flight_fetch_still_applies_after_stop() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            api.push_delayed(
                Duration::from_secs(2),
                Reply::Events(vec![event(1, "push", 5)]),
            );
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;
            ctl.stop();

            time::sleep(Duration::from_secs(3)).await;
            let state = ctl.snapshot();
            assert_eq!(state.events().len(), 1);
            assert!(!state.loading);
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn timer_fetch_in_flight_still_applies_after_stop() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            api.push(Reply::Events(Vec::new()));
            api.push_delayed(
                Duration::from_secs(3),
                Reply::Events(vec![event(1, "push", 5)]),
            );
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;

            time::sleep(DEFAULT_POLL_INTERVAL).await;
            assert_eq!(api.fetch_calls.get(), 2);
            ctl.stop();
            assert!(!ctl.is_polling_armed());

            time::sleep(Duration::from_secs(5)).await;
            let state = ctl.snapshot();
            assert_eq!(state.events().len(), 1);
            assert!(!state.loading);
            assert_eq!(api.fetch_calls.get(), 2);
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn timer_fetch_in_flight_still_applies_after_pausing() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            api.push(Reply::Events(Vec::new()));
            api.push_delayed(Duration::from_secs(3), Reply::Status(503));
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;

            time::sleep(DEFAULT_POLL_INTERVAL).await;
            assert_eq!(api.fetch_calls.get(), 2);
            ctl.set_polling(false);

            time::sleep(Duration::from_secs(5)).await;
            assert_eq!(ctl.status(), ConnectionStatus::Error);
            assert_eq!(
                ctl.snapshot().error.as_deref(),
                Some("HTTP error! status: 503")
            );

            time::sleep(Duration::from_secs(60)).await;
            assert_eq!(api.fetch_calls.get(), 2);
            ctl.shutdown();
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn slow_timer_fetch_never_overlaps_the_next_tick() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            api.push(Reply::Events(Vec::new()));
            api.push_delayed(Duration::from_secs(20), Reply::Events(Vec::new()));
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;

            // Tick at 15s starts a 20s fetch; the 30s tick must wait for it.
            time::sleep(Duration::from_secs(20)).await;
            assert_eq!(api.fetch_calls.get(), 2);
            time::sleep(Duration::from_secs(12)).await;
            assert_eq!(api.fetch_calls.get(), 2);
            ctl.shutdown();
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn disabled_polling_only_fetches_once() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            let ctl = controller(&api);
            ctl.set_polling(false);
            ctl.start();
            time::sleep(Duration::from_secs(45)).await;
            assert_eq!(api.fetch_calls.get(), 1);
            assert!(!ctl.is_polling_armed());

            ctl.toggle_polling();
            assert!(ctl.polling_enabled());
            assert!(ctl.is_polling_armed());
            time::sleep(Duration::from_secs(15)).await;
            settle_idle().await;
            assert_eq!(api.fetch_calls.get(), 2);
            ctl.shutdown();
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn refresh_sets_loading_then_clears_once() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            api.push(Reply::Events(Vec::new()));
            api.push_delayed(Duration::from_secs(1), Reply::Status(500));
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;
            assert!(!ctl.is_loading());

            ctl.refresh();
            // Subscribed after `refresh()` so its own bump is already seen.
            let mut rx = ctl.subscribe();
            assert!(ctl.is_loading());
            assert_eq!(ctl.status(), ConnectionStatus::Loading);

            rx.changed().await.unwrap();
            assert!(!ctl.is_loading());
            assert_eq!(ctl.status(), ConnectionStatus::Error);

            time::sleep(Duration::from_secs(5)).await;
            assert!(!ctl.is_loading());
            assert_eq!(api.fetch_calls.get(), 2);
            ctl.shutdown();
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn failed_poll_keeps_previous_events() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            api.push(Reply::Events(vec![event(1, "push", 30), event(2, "merge", 60)]));
            api.push(Reply::Status(502));
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;
            let first = ctl.snapshot();
            assert_eq!(first.status(), ConnectionStatus::Live);

            time::sleep(Duration::from_secs(15)).await;
            settle_idle().await;
            let second = ctl.snapshot();
            assert_eq!(second.events(), first.events());
            assert_eq!(second.status(), ConnectionStatus::Error);
            assert_eq!(second.error.as_deref(), Some("HTTP error! status: 502"));
            assert_eq!(second.last_updated, first.last_updated);
            ctl.shutdown();
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn older_outcome_settling_late_is_discarded() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            // First request is slow and would report an error.
            api.push_delayed(
                Duration::from_secs(5),
                Reply::Application("stale".to_string()),
            );
            // Second request answers right away.
            api.push(Reply::Events(vec![event(7, "push", 1)]));

            let ctl = controller(&api);
            ctl.set_polling(false);
            ctl.start();
            settle_idle().await;
            ctl.refresh();
            settle_idle().await;
            assert_eq!(ctl.snapshot().events().len(), 1);

            time::sleep(Duration::from_secs(6)).await;
            let state = ctl.snapshot();
            assert!(state.error.is_none(), "stale failure must not apply");
            assert_eq!(state.events().len(), 1);
            assert!(!state.loading);
        });
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn outcome_after_shutdown_is_ignored() {
        with_local_set!(async {
            let api = Rc::new(ScriptedApi::default());
            api.push_delayed(
                Duration::from_secs(3),
                Reply::Events(vec![event(1, "push", 1)]),
            );
            let ctl = controller(&api);
            ctl.start();
            settle_idle().await;
            ctl.shutdown();

            time::sleep(Duration::from_secs(5)).await;
            let state = ctl.snapshot();
            assert!(state.events().is_empty());
            assert!(state.last_updated.is_none());

            ctl.refresh();
            ctl.start();
            settle_idle().await;
            assert_eq!(api.fetch_calls.get(), 1);
        });
    }
}
