//! Color and style tokens for the ratatui dashboard.
//!
//! Uses explicit foreground + background pairs so the UI is readable
//! regardless of the user's terminal theme (light or dark).

use ratatui::style::{Color, Modifier, Style};

use crate::status::ConnectionStatus;

/// Dark base background used for all panels.
const BG: Color = Color::Black;

pub fn border() -> Style {
    Style::default().fg(Color::DarkGray).bg(BG)
}

pub fn title() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

pub fn subdued() -> Style {
    Style::default().fg(Color::Rgb(180, 180, 180)).bg(BG)
}

pub fn text() -> Style {
    Style::default().fg(Color::White).bg(BG)
}

/// Status dot and label color.
pub fn status(status: ConnectionStatus) -> Style {
    let fg = match status {
        ConnectionStatus::Loading => Color::Yellow,
        ConnectionStatus::Error => Color::Red,
        ConnectionStatus::Live => Color::Green,
    };
    Style::default().fg(fg).bg(BG).add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default()
        .fg(Color::Red)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

/// Accent color per event category key.
pub fn category(key: &str) -> Style {
    let fg = match key {
        "push" => Color::Green,
        "pull-request" => Color::Blue,
        "merge" => Color::Magenta,
        "issue" | "issues" => Color::Yellow,
        "release" => Color::Cyan,
        _ => Color::Gray,
    };
    Style::default().fg(fg).bg(BG).add_modifier(Modifier::BOLD)
}
