//! Application event handling.
//!
//! Processes background task completion events: feed page fetches and
//! browser-open failures.

use crate::app::{App, AppEvent};

/// Apply one background task event to application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded {
            generation,
            replace,
            result,
        } => {
            if generation != app.page_generation {
                // A newer fetch superseded this one (rapid reloads); the
                // response belongs to a feed session that no longer exists.
                tracing::debug!(
                    generation,
                    current = app.page_generation,
                    "Discarding stale page fetch result"
                );
                return;
            }
            app.page_loading = false;
            match result {
                Ok(page) => {
                    let count = page.videos.len();
                    if replace {
                        app.load_initial_page(page);
                        app.set_status(format!("Feed reloaded ({count} videos)"));
                    } else {
                        tracing::info!(count, "Appended feed page");
                        app.apply_page(page);
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "Feed page fetch failed");
                    app.set_status(format!("Feed error: {error}"));
                }
            }
        }
        AppEvent::BrowserOpenFailed { error } => {
            app.set_status(format!("Could not open browser: {error}"));
        }
    }
}
