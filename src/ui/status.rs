//! Status bar widget.

use crate::app::App;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const KEY_HINT: &str = "j/k navigate · J/K scroll · space pause · o open · r reload · ? help";

/// One-line status bar: transient message (or key hint) on the left,
/// position and pagination state on the right.
pub(super) fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let left: Span = match &app.status_message {
        Some((msg, _)) => Span::styled(msg.clone(), Style::default().fg(Color::Yellow)),
        None => Span::styled(KEY_HINT, Style::default().fg(Color::DarkGray)),
    };

    let position = match app.controller.active_index() {
        Some(active) => format!("{}/{}", active + 1, app.videos.len()),
        None => "—".to_string(),
    };
    let right = if app.page_loading {
        format!("loading more…  {position}")
    } else if app.has_next_page {
        format!("more below  {position}")
    } else {
        position
    };

    let pad = (area.width as usize)
        .saturating_sub(left.width())
        .saturating_sub(right.len());
    let line = Line::from(vec![
        left,
        Span::raw(" ".repeat(pad)),
        Span::styled(right, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
