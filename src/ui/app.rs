//! UI runtime loop backed by ratatui + crossterm.
//!
//! Runs on the same `LocalSet` as the polling controller: each pass drains
//! pending key presses, redraws from a fresh state snapshot, then yields to
//! the fetch tasks for `DRAW_INTERVAL`.

use std::io;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tracing::debug;

use crate::controller::PollingController;
use crate::dashboard::{Body, Dashboard};
use crate::sample::SampleDataTrigger;
use crate::ui::event::UiAction;
use crate::ui::view;

const DRAW_INTERVAL: Duration = Duration::from_millis(50);

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Runs `cleanup` before the previously installed panic hook while alive;
/// puts the previous hook back on drop.
struct PanicHookGuard {
    previous: Arc<PanicHook>,
}

impl PanicHookGuard {
    fn install(cleanup: fn()) -> Self {
        let previous = Arc::new(panic::take_hook());
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            cleanup();
            chained(info);
        }));
        Self { previous }
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        let previous = Arc::clone(&self.previous);
        let _ = panic::take_hook();
        panic::set_hook(Box::new(move |info| previous(info)));
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Take over the terminal and run the dashboard until the user quits.
pub async fn run(controller: &PollingController, sample: &SampleDataTrigger) -> io::Result<()> {
    let _hook = PanicHookGuard::install(restore_terminal);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    enable_raw_mode()?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, controller, sample).await;

    let _ = terminal.show_cursor();
    restore_terminal();
    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &PollingController,
    sample: &SampleDataTrigger,
) -> io::Result<()> {
    let mut scroll = 0usize;

    loop {
        let dash = Dashboard::build(&controller.snapshot(), Utc::now());
        let rows = match &dash.body {
            Body::Populated(rows) => rows.len(),
            _ => 0,
        };

        for action in drain_actions() {
            if apply_action(action, controller, sample, &mut scroll, rows) {
                return Ok(());
            }
        }

        terminal.draw(|frame| view::render(frame, &dash, scroll))?;
        tokio::time::sleep(DRAW_INTERVAL).await;
    }
}

fn drain_actions() -> Vec<UiAction> {
    // Drain ALL available events before returning, so held-key repeats are
    // batched into a single redraw cycle.
    let mut actions = Vec::new();
    loop {
        let Ok(has_event) = event::poll(Duration::from_millis(0)) else {
            break;
        };
        if !has_event {
            break;
        }
        let Ok(ev) = event::read() else {
            break;
        };
        if let Event::Key(key) = ev {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = UiAction::from_key(key) {
                actions.push(action);
            }
        }
    }
    actions
}

/// Apply one action. Returns `true` when the dashboard should exit.
fn apply_action(
    action: UiAction,
    controller: &PollingController,
    sample: &SampleDataTrigger,
    scroll: &mut usize,
    rows: usize,
) -> bool {
    debug!(?action, "ui action");
    match action {
        UiAction::Refresh => {
            // Like a disabled button: no new request while one is showing.
            if !controller.is_loading() {
                controller.refresh();
            }
        }
        UiAction::SeedSample => sample.spawn(),
        UiAction::TogglePolling => controller.toggle_polling(),
        UiAction::ScrollUp(n) => *scroll = scroll.saturating_sub(n),
        UiAction::ScrollDown(n) => *scroll = (*scroll + n).min(rows.saturating_sub(1)),
        UiAction::ScrollTop => *scroll = 0,
        UiAction::Quit => return true,
    }
    false
}
