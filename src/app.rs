use crate::api::{FeedPage, VideoItem};
use crate::config::Config;
use crate::controller::{Effect, FeedController, FeedEvent, ItemId};
use crate::player::PlaybackClock;
use crate::viewport::FeedViewport;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// How close to the end of the loaded feed the active item may get before
/// the next page is requested.
const PAGINATION_LOOKAHEAD: usize = 3;

// ============================================================================
// Background Task Events
// ============================================================================

/// Events from background tasks.
pub enum AppEvent {
    /// A feed page fetch finished.
    ///
    /// Fields:
    /// - `generation`: The generation counter when this fetch was spawned
    /// - `replace`: True for a reload (replace the list), false for a
    ///   pagination append
    /// - `result`: The page, or an error message for the status bar
    PageLoaded {
        generation: u64,
        replace: bool,
        result: Result<FeedPage, String>,
    },
    /// Opening the active video in the browser failed.
    BrowserOpenFailed { error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
pub struct App {
    pub config: Config,

    /// Video list wrapped in Arc for O(1) sharing with render code.
    /// Append-only while the feed is mounted; mutations create a new Vec.
    pub videos: Arc<Vec<VideoItem>>,

    /// The active-item reconciliation core.
    pub controller: FeedController,
    /// Scroll surface: offsets, smooth-scroll animation, geometry.
    pub viewport: FeedViewport,
    /// Progress clock for the active video.
    pub playback: PlaybackClock,

    // Pagination
    /// Opaque cursor returned by the last page, echoed on the next request.
    pub next_cursor: Option<String>,
    /// Gate for issuing further page requests.
    pub has_next_page: bool,
    /// True while a page fetch is in flight.
    pub page_loading: bool,

    /// Generation counter for page fetches.
    ///
    /// Incremented each time a fetch is spawned; responses carrying a stale
    /// generation are rejected so an aborted reload cannot append into the
    /// wrong session.
    pub page_generation: u64,

    /// Handle to the in-flight page fetch for cancellation.
    pub page_handle: Option<tokio::task::JoinHandle<()>>,

    // UI state
    /// Status message with expiry — Cow avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,
    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Last user input time, for logging slow-interaction diagnostics.
    pub last_input_time: Instant,
}

impl App {
    pub fn new(config: Config, viewport: FeedViewport) -> Self {
        let controller = FeedController::new(config.settle_quiet_period());
        Self {
            config,
            videos: Arc::new(Vec::new()),
            controller,
            viewport,
            playback: PlaybackClock::new(),
            next_cursor: None,
            has_next_page: false,
            page_loading: false,
            page_generation: 0,
            page_handle: None,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            last_input_time: Instant::now(),
        }
    }

    /// Install the first feed page: item list, cursor state, playback for
    /// the initial active item. An empty page is valid (empty-feed state).
    pub fn load_initial_page(&mut self, page: FeedPage) {
        self.controller.initialize(item_ids(&page.videos));
        self.videos = Arc::new(page.videos);
        self.next_cursor = page.next_cursor;
        self.has_next_page = page.has_next_page;
        self.start_playback_for_active();
        self.needs_redraw = true;
    }

    /// Append a later page. Existing indices keep their meaning.
    pub fn apply_page(&mut self, page: FeedPage) {
        let was_empty = self.videos.is_empty();
        self.controller.append(item_ids(&page.videos));

        let mut videos: Vec<VideoItem> = self.videos.as_ref().clone();
        videos.extend(page.videos);
        self.videos = Arc::new(videos);

        self.next_cursor = page.next_cursor;
        self.has_next_page = page.has_next_page;
        if was_empty {
            self.start_playback_for_active();
        }
        self.needs_redraw = true;
    }

    /// Route one feed event through the controller and execute whatever
    /// effect it requests. The single entry point for navigation,
    /// visibility, and scroll signals.
    pub fn dispatch(&mut self, event: FeedEvent) {
        let before = self.controller.active_index();
        if let Some(Effect::ScrollToItem(index)) = self.controller.handle(event) {
            self.viewport.scroll_to(index);
        }
        if self.controller.active_index() != before {
            self.on_active_changed();
        }
    }

    /// Poll the settle timer against the current viewport geometry.
    pub fn poll_settle(&mut self) {
        let before = self.controller.active_index();
        if self.controller.poll_settle(&self.viewport) {
            self.needs_redraw = true;
            if self.controller.active_index() != before {
                self.on_active_changed();
            }
        }
    }

    fn on_active_changed(&mut self) {
        self.start_playback_for_active();
        self.needs_redraw = true;
        tracing::debug!(
            active = ?self.controller.active_index(),
            id = ?self.controller.active_item().map(|id| id.as_ref().to_owned()),
            "Active video changed"
        );
    }

    /// Restart the playback clock for whichever video is now active.
    pub fn start_playback_for_active(&mut self) {
        match self.active_video() {
            Some(video) => {
                let duration = video.duration.map(Duration::from_secs_f64);
                self.playback.watch(duration);
            }
            None => self.playback.stop(),
        }
    }

    /// Currently active video (bounds-checked).
    pub fn active_video(&self) -> Option<&VideoItem> {
        self.controller
            .active_index()
            .and_then(|i| self.videos.get(i))
    }

    /// Whether the active item is close enough to the end of the loaded
    /// list that the next page should be fetched.
    pub fn should_fetch_next_page(&self) -> bool {
        if self.page_loading || !self.has_next_page {
            return false;
        }
        match self.controller.active_index() {
            Some(active) => active + PAGINATION_LOOKAHEAD >= self.videos.len(),
            None => false,
        }
    }

    /// Set status message (will auto-expire after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired (older than 3 seconds).
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Unmount the feed: controller teardown, observer disconnect, abort
    /// the in-flight page fetch. Late callbacks after this are no-ops.
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.viewport.teardown();
        self.playback.stop();
        if let Some(handle) = self.page_handle.take() {
            handle.abort();
            tracing::debug!("Aborted page fetch task on teardown");
        }
    }
}

/// Abort in-flight async tasks on App drop so no orphaned task outlives
/// the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.page_handle.take() {
            handle.abort();
            tracing::debug!("Aborted page fetch task on App drop");
        }
    }
}

fn item_ids(videos: &[VideoItem]) -> Vec<ItemId> {
    videos.iter().map(|v| Arc::from(v.id.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VideoAuthor;
    use crate::controller::{visibility_channel, Direction};
    use chrono::Utc;

    fn test_video(id: &str, duration: Option<f64>) -> VideoItem {
        VideoItem {
            id: id.to_string(),
            title: format!("Video {id}"),
            description: None,
            url: format!("https://cdn.example.com/{id}.mp4"),
            thumbnail: None,
            duration,
            created_at: Utc::now(),
            user: VideoAuthor {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                image: None,
            },
        }
    }

    fn test_page(ids: &[&str], has_next: bool) -> FeedPage {
        FeedPage {
            videos: ids.iter().map(|id| test_video(id, Some(10.0))).collect(),
            next_cursor: has_next.then(|| "cursor-1".to_string()),
            has_next_page: has_next,
        }
    }

    fn test_app() -> App {
        let (publisher, _rx) = visibility_channel();
        App::new(Config::default(), FeedViewport::new(publisher))
    }

    #[tokio::test]
    async fn test_initial_page_activates_first_video() {
        let mut app = test_app();
        app.load_initial_page(test_page(&["a", "b", "c"], true));

        assert_eq!(app.controller.active_index(), Some(0));
        assert_eq!(app.active_video().map(|v| v.id.as_str()), Some("a"));
        assert!(app.has_next_page);
    }

    #[tokio::test]
    async fn test_empty_feed_is_valid_state() {
        let mut app = test_app();
        app.load_initial_page(test_page(&[], false));

        assert_eq!(app.controller.active_index(), None);
        assert!(app.active_video().is_none());
        app.dispatch(FeedEvent::Navigate(Direction::Next)); // Must not panic
        assert_eq!(app.controller.active_index(), None);
    }

    #[tokio::test]
    async fn test_apply_page_appends_without_moving_active() {
        let mut app = test_app();
        app.load_initial_page(test_page(&["a", "b"], true));
        app.dispatch(FeedEvent::NavigateTo(1));

        app.apply_page(test_page(&["c", "d"], false));

        assert_eq!(app.videos.len(), 4);
        assert_eq!(app.controller.active_index(), Some(1));
        assert!(!app.has_next_page);
    }

    #[tokio::test]
    async fn test_should_fetch_next_page_near_end() {
        let mut app = test_app();
        app.load_initial_page(test_page(&["a", "b", "c", "d", "e"], true));
        assert!(!app.should_fetch_next_page()); // Active 0 of 5

        app.dispatch(FeedEvent::NavigateTo(2));
        assert!(app.should_fetch_next_page()); // 2 + lookahead reaches the end
    }

    #[tokio::test]
    async fn test_should_not_fetch_when_exhausted_or_loading() {
        let mut app = test_app();
        app.load_initial_page(test_page(&["a", "b"], false));
        app.dispatch(FeedEvent::NavigateTo(1));
        assert!(!app.should_fetch_next_page()); // hasNextPage is false

        app.has_next_page = true;
        app.page_loading = true;
        assert!(!app.should_fetch_next_page()); // Fetch already in flight
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_restarts_playback_on_active_change() {
        let mut app = test_app();
        app.load_initial_page(test_page(&["a", "b"], false));
        assert!(app.playback.progress().is_some());

        app.dispatch(FeedEvent::Navigate(Direction::Next));
        let (elapsed, _) = app.playback.progress().unwrap();
        assert_eq!(elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        app.set_status("Test message");
        assert!(app.status_message.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some()); // Still present at 2s

        tokio::time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_none()); // Expired after 3s
    }

    #[tokio::test]
    async fn test_teardown_ignores_late_events() {
        let mut app = test_app();
        app.load_initial_page(test_page(&["a", "b", "c"], false));
        app.teardown();

        app.dispatch(FeedEvent::Navigate(Direction::Next));
        app.dispatch(FeedEvent::Visibility {
            index: 2,
            intersecting: true,
        });
        app.poll_settle();
        assert_eq!(app.controller.active_index(), Some(0));
    }
}
