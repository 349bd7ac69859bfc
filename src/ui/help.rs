//! Help overlay widget.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("j / ↓", "Next video"),
    ("k / ↑", "Previous video"),
    ("J / PgDn", "Scroll down (free scroll)"),
    ("K / PgUp", "Scroll up (free scroll)"),
    ("wheel", "Free scroll"),
    ("g / Home", "First video"),
    ("G / End", "Last video"),
    ("space", "Pause / resume"),
    ("o", "Open active video in browser"),
    ("r", "Reload feed"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

/// Render the help overlay centered over the feed.
pub(super) fn render_help(f: &mut Frame, area: Rect) {
    let height = (HELP_ENTRIES.len() + 4).min(area.height as usize) as u16;
    let width = 44.min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Keys ");

    let mut lines = vec![Line::default()];
    for (key, action) in HELP_ENTRIES {
        lines.push(Line::styled(
            format!("  {key:<10} {action}"),
            Style::default(),
        ));
    }
    lines.push(Line::default());
    lines.push(Line::styled(
        "press any key to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ));

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Left),
        popup,
    );
}
