//! Vertical feed widget: one viewport-height card per video.
//!
//! The render pass is also the measurement pass: it records the layout in
//! the viewport (which publishes visibility transitions and serves
//! geometry to the controller's settle resolution) and then draws the
//! cards that intersect the visible area.

use crate::app::App;
use crate::util::{format_age, format_timestamp, truncate_to_width};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use std::sync::Arc;

/// Render the feed column.
pub(super) fn render_feed(f: &mut Frame, area: Rect, app: &mut App) {
    // Measurement first: the viewport needs this frame's geometry before
    // cards are drawn or visibility is decided.
    app.viewport
        .set_layout(area.height as usize, app.videos.len());

    let videos = Arc::clone(&app.videos);
    let active = app.controller.active_index();
    let card_height = app.viewport.item_height() as isize;

    for (index, video) in videos.iter().enumerate() {
        let top = app.viewport.item_top(index);
        let bottom = top + card_height;
        if bottom <= 0 || top >= area.height as isize {
            continue; // Fully outside the viewport
        }

        // Clip the card to the visible region.
        let y0 = top.max(0) as u16;
        let y1 = (bottom.min(area.height as isize)) as u16;
        let rect = Rect {
            x: area.x,
            y: area.y + y0,
            width: area.width,
            height: y1 - y0,
        };

        let is_active = active == Some(index);
        render_card(f, rect, app, video, index, is_active);
    }
}

fn render_card(
    f: &mut Frame,
    rect: Rect,
    app: &App,
    video: &crate::api::VideoItem,
    index: usize,
    is_active: bool,
) {
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_width = rect.width.saturating_sub(12) as usize;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(
            " {} — {}/{} ",
            truncate_to_width(&video.title, title_width),
            index + 1,
            app.videos.len()
        ));

    let inner = block.inner(rect);
    f.render_widget(block, rect);
    if inner.height == 0 {
        return;
    }

    let text_style = if is_active {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            format!("@{}", video.user.name),
            text_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ·  {}", format_age(video.created_at)), text_style),
    ]));
    lines.push(Line::default());

    if let Some(description) = &video.description {
        lines.push(Line::styled(description.clone(), text_style));
        lines.push(Line::default());
    }

    if is_active {
        lines.push(progress_line(app, inner.width as usize));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left);
    f.render_widget(paragraph, inner);
}

/// Playback progress for the active card: `▶ 0:42 ████░░░░ 1:30`, or an
/// indeterminate marker when the duration is unknown.
fn progress_line(app: &App, width: usize) -> Line<'static> {
    let marker = if app.playback.is_paused() { "⏸" } else { "▶" };
    match app.playback.progress() {
        Some((elapsed, total)) => {
            let elapsed_str = format_timestamp(elapsed);
            let total_str = format_timestamp(total);
            // Marker + two timestamps + three separating spaces.
            let bar_width = width
                .saturating_sub(elapsed_str.len() + total_str.len() + marker.len() + 3)
                .max(4);
            let ratio = if total.as_secs_f64() > 0.0 {
                (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let filled = (bar_width as f64 * ratio).round() as usize;
            let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
            Line::from(vec![
                Span::styled(
                    format!("{marker} {elapsed_str} "),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(bar, Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {total_str}"), Style::default().fg(Color::Cyan)),
            ])
        }
        None => Line::styled(
            format!("{marker} live"),
            Style::default().fg(Color::Cyan),
        ),
    }
}

/// Empty-feed state: a valid state, not an error.
pub(super) fn render_empty(f: &mut Frame, area: Rect, app: &mut App) {
    // Keep the viewport's layout in sync even with nothing to show.
    app.viewport.set_layout(area.height as usize, 0);

    let lines = vec![
        Line::default(),
        Line::styled(
            "No videos yet",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::styled(
            "Be the first to upload a video and share it with the world!",
            Style::default().fg(Color::DarkGray),
        ),
        Line::default(),
        Line::styled(
            "Press r to reload, q to quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
