//! View rendering dispatch.

use crate::app::App;
use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

use super::{feed, help, status};

/// Render one frame: feed (or empty state), status bar, optional help
/// overlay.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let chunks =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(f.area());

    if app.videos.is_empty() {
        feed::render_empty(f, chunks[0], app);
    } else {
        feed::render_feed(f, chunks[0], app);
    }

    status::render_status(f, chunks[1], app);

    if app.show_help {
        help::render_help(f, f.area());
    }
}
