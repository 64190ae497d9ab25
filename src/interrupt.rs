//! Ctrl+C handling for the plain-text watch mode.
//!
//! The full-screen UI runs the terminal in raw mode and sees Ctrl+C as a key
//! press, so only plain mode installs a SIGINT handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use signal_hook::consts::SIGINT;

/// Process-wide flag; handlers are registered with the OS at most once.
static PRESSED: OnceLock<Arc<AtomicBool>> = OnceLock::new();

const CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to the SIGINT flag.
#[derive(Debug, Clone)]
pub struct Interrupt {
    pressed: Arc<AtomicBool>,
}

impl Interrupt {
    /// Register SIGINT handlers on first use and return a handle.
    ///
    /// A second Ctrl+C while the first is still pending exits with status 130.
    pub fn install() -> Result<Self> {
        if let Some(pressed) = PRESSED.get() {
            return Ok(Self {
                pressed: Arc::clone(pressed),
            });
        }

        let pressed = Arc::new(AtomicBool::new(false));

        // Registered before the flag handler so it sees the previous value.
        let already = Arc::clone(&pressed);
        unsafe {
            signal_hook::low_level::register(SIGINT, move || {
                if already.load(Ordering::SeqCst) {
                    std::process::exit(130);
                }
            })
            .context("Failed to register SIGINT handler")?;
        }
        signal_hook::flag::register(SIGINT, Arc::clone(&pressed))
            .context("Failed to register SIGINT flag")?;

        let pressed = PRESSED.get_or_init(|| pressed);
        Ok(Self {
            pressed: Arc::clone(pressed),
        })
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::SeqCst)
    }

    /// Resolve once Ctrl+C has been pressed.
    pub async fn wait(&self) {
        while !self.is_pressed() {
            tokio::time::sleep(CHECK_INTERVAL).await;
        }
    }
}
