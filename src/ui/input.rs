//! Keyboard and mouse input handling.

use crate::api::FeedClient;
use crate::app::{App, AppEvent};
use crate::controller::{Direction, FeedEvent};
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use super::loop_runner::{spawn_page_fetch, Action};

/// Rows moved per manual scroll step (wheel notch or J/K).
const SCROLL_STEP: isize = 3;

/// Handle a key press. Returns whether the event loop should continue.
pub(super) fn handle_key(
    app: &mut App,
    client: &FeedClient,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Help overlay swallows everything except quit.
    if app.show_help {
        match code {
            KeyCode::Char('q') => return Action::Quit,
            _ => {
                app.show_help = false;
                return Action::Continue;
            }
        }
    }

    match (code, modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => {
            return Action::Quit;
        }
        (KeyCode::Char('?'), _) => {
            app.show_help = true;
        }

        // Programmatic navigation: optimistic jump + smooth scroll.
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            app.dispatch(FeedEvent::Navigate(Direction::Next));
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            app.dispatch(FeedEvent::Navigate(Direction::Previous));
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
            app.dispatch(FeedEvent::NavigateTo(0));
        }
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
            if !app.controller.is_empty() {
                app.dispatch(FeedEvent::NavigateTo(app.controller.len() - 1));
            }
        }

        // Raw scroll gesture: moves the viewport directly and lets the
        // settle resolution pick the new active item.
        (KeyCode::Char('J'), _) | (KeyCode::PageDown, _) => {
            scroll_gesture(app, SCROLL_STEP);
        }
        (KeyCode::Char('K'), _) | (KeyCode::PageUp, _) => {
            scroll_gesture(app, -SCROLL_STEP);
        }

        (KeyCode::Char(' '), _) => {
            app.playback.toggle_pause();
        }
        (KeyCode::Char('o'), _) => {
            open_active_in_browser(app, event_tx);
        }
        (KeyCode::Char('r'), _) => {
            app.set_status("Reloading feed...");
            spawn_page_fetch(app, client, event_tx, true);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle a mouse event (wheel scrolling only).
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => scroll_gesture(app, SCROLL_STEP),
        MouseEventKind::ScrollUp => scroll_gesture(app, -SCROLL_STEP),
        _ => {}
    }
}

/// Apply a manual scroll and report it to the controller as a raw sample.
fn scroll_gesture(app: &mut App, delta: isize) {
    if app.viewport.scroll_by(delta) {
        app.dispatch(FeedEvent::ScrollSample);
        app.needs_redraw = true;
    }
}

/// Open the active video's URL in the default browser.
///
/// `open::that` can block on some platforms, so it runs on the blocking
/// pool; failures come back through the event channel.
fn open_active_in_browser(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(video) = app.active_video() else {
        return;
    };
    let url = video.url.clone();
    app.set_status("Opening in browser...");
    let tx = event_tx.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, url = %url, "Failed to open browser");
            let _ = tx.blocking_send(AppEvent::BrowserOpenFailed {
                error: e.to_string(),
            });
        }
    });
}
