//! Keyboard input mapped to dashboard actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Refresh,
    SeedSample,
    TogglePolling,
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollTop,
    Quit,
}

impl UiAction {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Self::Quit)
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char('r') | KeyCode::F(5) => Some(Self::Refresh),
            KeyCode::Char('s') => Some(Self::SeedSample),
            KeyCode::Char('p') => Some(Self::TogglePolling),
            KeyCode::Up | KeyCode::Char('k') => Some(Self::ScrollUp(1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Self::ScrollDown(1)),
            KeyCode::PageUp => Some(Self::ScrollUp(10)),
            KeyCode::PageDown => Some(Self::ScrollDown(10)),
            KeyCode::Home => Some(Self::ScrollTop),
            _ => None,
        }
    }
}
