//! Plain-text dashboard rendering with ANSI colors.
//!
//! Used when the full-screen UI is disabled: every settled fetch prints one
//! snapshot of the dashboard.

use colored::{ColoredString, Colorize};

use crate::dashboard::{self, Body, Dashboard, Header};
use crate::status::ConnectionStatus;

/// Format one dashboard snapshot.
pub fn format_dashboard(dash: &Dashboard) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "{} {}",
        dashboard::TITLE.cyan().bold(),
        dashboard::SUBTITLE.dimmed()
    ));
    out.push(format_status(&dash.header));
    out.push(format!(
        "{} ({})",
        "Recent Activity".bold(),
        dash.header.count_label()
    ));

    match &dash.body {
        Body::LoadingEmpty => out.push(format!("  {}", "Loading events...".yellow())),
        Body::ErrorEmpty { message } => {
            out.push(format!("  {}", "Connection Error".red().bold()));
            out.push(format!("  {}", message.red()));
            out.push(format!("  {}", "Press r to try again.".dimmed()));
        }
        Body::EmptyLive => {
            out.push(format!("  {}", dashboard::EMPTY_TITLE.bold()));
            out.push(format!("  {}", dashboard::EMPTY_MESSAGE.dimmed()));
            out.push(format!("  {}", dashboard::EMPTY_HINT.dimmed()));
        }
        Body::Populated(rows) => {
            for row in rows {
                let action = format!("[{}]", row.action);
                let mut line = format!("  {} {}", category_color(&row.category, &action), row.message);
                if !row.relative_time.is_empty() {
                    line.push_str(&format!(" {}", format!("· {}", row.relative_time).dimmed()));
                }
                out.push(line);
            }
        }
    }

    out.join("\n")
}

/// Print one dashboard snapshot followed by a separator.
pub fn print_dashboard(dash: &Dashboard) {
    println!("{}", format_dashboard(dash));
    print_separator();
}

fn format_status(header: &Header) -> String {
    let dot = match header.status {
        ConnectionStatus::Loading => "●".yellow(),
        ConnectionStatus::Error => "●".red(),
        ConnectionStatus::Live => "●".green(),
    };
    let mut line = format!("{} {}", dot, header.status.label().bold());
    if let Some(updated) = header.last_updated_label() {
        line.push_str(&format!("  {}", updated.dimmed()));
    }
    if !header.polling_enabled {
        line.push_str(&format!("  {}", "(auto-refresh paused)".dimmed()));
    }
    line
}

fn category_color(category: &str, text: &str) -> ColoredString {
    match category {
        "push" => text.green(),
        "pull-request" => text.blue(),
        "merge" => text.magenta(),
        "issue" | "issues" => text.yellow(),
        "release" => text.cyan(),
        _ => text.normal(),
    }
}

fn print_separator() {
    let width = terminal_width();
    println!("{}", "-".repeat(width).dimmed());
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
        .clamp(20, 120)
}
