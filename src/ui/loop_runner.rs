//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal
//! input, visibility events from the feed viewport, background task
//! events, and the periodic tick that drives scroll animation, scroll
//! settling, and the playback clock.

use crate::api::FeedClient;
use crate::app::{App, AppEvent};
use crate::controller::{FeedEvent, VisibilityEvent};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::{handle_key, handle_mouse};
use super::render::render;

/// Tick period. Drives the smooth-scroll animation, settle polling, and
/// progress bar updates, so it sits well under the settle quiet period.
const TICK_MS: u64 = 50;

/// Result of handling an input event.
///
/// Returned by input handlers to signal whether the application should
/// continue running or terminate gracefully.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex the event sources:
/// - **Terminal input**: Keys and mouse wheel from crossterm's async stream
/// - **Background tasks**: Page fetches via the `AppEvent` channel
/// - **Periodic tick**: animation, settle polling, playback, pagination
///
/// Visibility events published by the feed viewport are drained every
/// iteration and fed through the controller, which decides whether to
/// trust them (suppressed while a scroll gesture is in flight).
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
pub async fn run(
    app: &mut App,
    client: FeedClient,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
    mut visibility_rx: mpsc::UnboundedReceiver<VisibilityEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(TICK_MS));

    // Signal handlers for graceful shutdown (Unix only)
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending visibility transitions from the feed viewport. The
        // controller applies or suppresses them; no redraw unless the
        // active item actually moved (dispatch sets the dirty flag).
        while let Ok(VisibilityEvent {
            index,
            intersecting,
        }) = visibility_rx.try_recv()
        {
            app.dispatch(FeedEvent::Visibility {
                index,
                intersecting,
            });
        }

        // Drain background task results before handling more input so page
        // fetches are applied promptly even during rapid navigation.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;  // Process in order listed for predictable behavior

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        app.last_input_time = tokio::time::Instant::now();
                        app.needs_redraw = true;
                        match handle_key(app, &client, key.code, key.modifiers, &event_tx) {
                            Action::Quit => break,
                            Action::Continue => {}
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        app.last_input_time = tokio::time::Instant::now();
                        handle_mouse(app, mouse);
                    }
                    Some(Ok(Event::Resize(..))) => {
                        app.needs_redraw = true;
                    }
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app, &client, &event_tx);
            }
        }
    }

    // Unmount before the terminal goes away: cancels the settle timer and
    // severs the visibility stream so nothing fires into a dead feed.
    app.teardown();

    restore_terminal(terminal)?;
    Ok(())
}

/// Periodic tick: advance the smooth scroll, poll the settle timer, drive
/// playback, and trigger near-end pagination.
fn handle_tick(app: &mut App, client: &FeedClient, event_tx: &mpsc::Sender<AppEvent>) {
    // Each animation step is a scroll sample: programmatic scrolling goes
    // through the same settle pipeline as a user gesture, which is what
    // lets the closest-center resolution correct an optimistic navigate.
    if app.viewport.animate_tick() {
        app.dispatch(FeedEvent::ScrollSample);
        app.needs_redraw = true;
    }

    app.poll_settle();

    if app.playback.poll_finished() {
        tracing::debug!("Active video finished playing");
        if app.config.autoplay_advance {
            if let Some(active) = app.controller.active_index() {
                // Clamped no-op on the last item.
                app.dispatch(FeedEvent::NavigateTo(active + 1));
            }
        }
    }

    // Keep the progress bar moving while something is playing.
    if app.playback.progress().is_some() && !app.playback.is_paused() {
        app.needs_redraw = true;
    }

    if app.should_fetch_next_page() {
        spawn_page_fetch(app, client, event_tx, false);
    }
}

/// Spawn a background feed page fetch.
///
/// Any previous fetch is aborted and the generation counter bumped, so a
/// stale response can never append into a newer feed session. `replace`
/// distinguishes a full reload from a pagination append.
pub(super) fn spawn_page_fetch(
    app: &mut App,
    client: &FeedClient,
    event_tx: &mpsc::Sender<AppEvent>,
    replace: bool,
) {
    if let Some(handle) = app.page_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous page fetch task");
    }

    app.page_generation = app.page_generation.wrapping_add(1);
    let generation = app.page_generation;
    app.page_loading = true;

    let cursor = if replace { None } else { app.next_cursor.clone() };
    let limit = app.config.page_size;
    let client = client.clone();
    let tx = event_tx.clone();

    tracing::debug!(generation, replace, "Spawning page fetch task");

    app.page_handle = Some(tokio::spawn(async move {
        let result = client
            .fetch_page(cursor.as_deref(), limit)
            .await
            .map_err(|e| e.to_string());
        let event = AppEvent::PageLoaded {
            generation,
            replace,
            result,
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send page result (receiver dropped)");
        }
    }));
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
