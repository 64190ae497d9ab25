//! Rendering functions for the ratatui dashboard.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::dashboard::{self, Body, Dashboard, EventRow, Header};
use crate::ui::theme;

/// Draw one frame of the UI. `scroll` is the index of the first event row.
pub fn render(frame: &mut Frame<'_>, dash: &Dashboard, scroll: usize) {
    // Paint the entire frame black so no terminal background bleeds through.
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(vec![
        Line::from(Span::styled(dashboard::TITLE, theme::title())),
        Line::from(Span::styled(dashboard::SUBTITLE, theme::subdued())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border()),
    );
    frame.render_widget(title, root[0]);

    render_status_bar(frame, &dash.header, root[1]);

    let panel = Block::default()
        .title(Line::from(vec![
            Span::styled("Recent Activity", theme::title()),
            Span::raw("  "),
            Span::styled(dash.header.count_label(), theme::subdued()),
        ]))
        .borders(Borders::ALL)
        .border_style(theme::border());

    match &dash.body {
        Body::LoadingEmpty => {
            let widget = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("◌  Loading events...", theme::status(dash.header.status))),
            ])
            .alignment(Alignment::Center)
            .block(panel);
            frame.render_widget(widget, root[2]);
        }
        Body::ErrorEmpty { message } => {
            let widget = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("⚠  Connection Error", theme::error())),
                Line::from(Span::styled(message.as_str(), theme::text())),
                Line::from(""),
                Line::from(Span::styled("[r] Try Again", theme::title())),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel);
            frame.render_widget(widget, root[2]);
        }
        Body::EmptyLive => {
            let widget = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(dashboard::EMPTY_TITLE, theme::title())),
                Line::from(Span::styled(dashboard::EMPTY_MESSAGE, theme::subdued())),
                Line::from(Span::styled(dashboard::EMPTY_HINT, theme::subdued())),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel);
            frame.render_widget(widget, root[2]);
        }
        Body::Populated(rows) => {
            let items: Vec<ListItem<'_>> = rows
                .iter()
                .skip(scroll.min(rows.len().saturating_sub(1)))
                .map(event_item)
                .collect();
            frame.render_widget(List::new(items).block(panel), root[2]);
        }
    }

    let footer = Paragraph::new(
        "r refresh · s sample data · p pause/resume polling · ↑/↓ scroll · q quit",
    )
    .style(theme::subdued());
    frame.render_widget(footer, root[3]);
}

fn render_status_bar(frame: &mut Frame<'_>, header: &Header, area: Rect) {
    let status_style = theme::status(header.status);
    let mut spans = vec![
        Span::styled("● ", status_style),
        Span::styled(header.status.label(), status_style),
    ];
    if let Some(updated) = header.last_updated_label() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(updated, theme::subdued()));
    }
    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        if header.polling_enabled {
            "auto-refresh on"
        } else {
            "auto-refresh paused"
        },
        theme::subdued(),
    ));

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border()),
    );
    frame.render_widget(bar, area);
}

fn event_item(row: &EventRow) -> ListItem<'static> {
    let accent = theme::category(&row.category);
    ListItem::new(vec![
        Line::from(vec![
            Span::styled("▌ ", accent),
            Span::styled(row.message.clone(), theme::text()),
        ]),
        Line::from(vec![
            Span::styled("▌ ", accent),
            Span::styled(format!("[{}]", row.action), accent),
            Span::raw("  "),
            Span::styled(row.relative_time.clone(), theme::subdued()),
        ]),
    ])
}
