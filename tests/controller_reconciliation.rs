//! Integration tests for active-item reconciliation: programmatic
//! navigation, visibility gating, scroll settling, and teardown, exercised
//! through the public controller and app APIs.

use flick::api::{FeedPage, VideoAuthor, VideoItem};
use flick::app::App;
use flick::config::Config;
use flick::controller::{
    visibility_channel, Direction, Effect, FeedController, FeedEvent, ItemGeometry, ItemId,
};
use flick::viewport::FeedViewport;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use tokio::time::{self, Duration};

/// Fixed-midpoint geometry standing in for a rendered feed.
struct FakeGeometry {
    viewport: Option<f64>,
    items: Vec<f64>,
}

impl ItemGeometry for FakeGeometry {
    fn viewport_midpoint(&self) -> Option<f64> {
        self.viewport
    }
    fn item_midpoint(&self, index: usize) -> Option<f64> {
        self.items.get(index).copied()
    }
}

fn ids(n: usize) -> Vec<ItemId> {
    (0..n).map(|i| Arc::from(format!("video-{i}"))).collect()
}

fn controller(n: usize) -> FeedController {
    let mut c = FeedController::new(Duration::from_millis(150));
    c.initialize(ids(n));
    c
}

// ============================================================================
// Clamping
// ============================================================================

#[test]
fn test_next_bursts_never_exceed_last_index() {
    let mut c = controller(5);
    for _ in 0..20 {
        c.handle(FeedEvent::Navigate(Direction::Next));
        let active = c.active_index().unwrap();
        assert!(active <= 4, "active index {active} escaped bounds");
    }
    assert_eq!(c.active_index(), Some(4));
}

#[test]
fn test_previous_bursts_never_go_below_zero() {
    let mut c = controller(5);
    for _ in 0..20 {
        c.handle(FeedEvent::Navigate(Direction::Previous));
    }
    assert_eq!(c.active_index(), Some(0));
}

proptest! {
    /// Any interleaving of navigation and visibility events keeps the
    /// active index inside `[0, len)`.
    #[test]
    fn prop_active_index_stays_in_bounds(
        len in 1usize..12,
        events in prop::collection::vec(0u8..4, 0..64),
        targets in prop::collection::vec(0usize..32, 64),
    ) {
        let mut c = FeedController::new(std::time::Duration::from_millis(150));
        c.initialize(ids(len));
        for (kind, target) in events.iter().zip(targets.iter()) {
            let event = match kind {
                0 => FeedEvent::Navigate(Direction::Next),
                1 => FeedEvent::Navigate(Direction::Previous),
                2 => FeedEvent::NavigateTo(*target),
                _ => FeedEvent::Visibility { index: *target, intersecting: true },
            };
            c.handle(event);
            let active = c.active_index().unwrap();
            prop_assert!(active < len);
        }
    }
}

// ============================================================================
// Empty Feed
// ============================================================================

#[test]
fn test_empty_feed_navigation_is_inert() {
    let mut c = FeedController::new(Duration::from_millis(150));
    c.initialize(Vec::new());

    assert_eq!(c.active_index(), None);
    assert_eq!(c.handle(FeedEvent::Navigate(Direction::Next)), None);
    assert_eq!(c.handle(FeedEvent::Navigate(Direction::Previous)), None);
    assert_eq!(c.handle(FeedEvent::NavigateTo(0)), None);
    assert_eq!(c.active_index(), None);
}

// ============================================================================
// Settle Resolution
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_settle_overrides_optimistic_navigation() {
    let mut c = controller(5);
    c.handle(FeedEvent::Navigate(Direction::Next));
    c.handle(FeedEvent::Navigate(Direction::Next));
    c.handle(FeedEvent::Navigate(Direction::Next));
    assert_eq!(c.active_index(), Some(3));

    // The scroll physically settled with item 2 nearest center.
    c.handle(FeedEvent::ScrollSample);
    time::advance(Duration::from_millis(151)).await;
    let geometry = FakeGeometry {
        viewport: Some(50.0),
        items: vec![0.0, 25.0, 48.0, 75.0, 100.0],
    };
    assert!(c.poll_settle(&geometry));
    assert_eq!(c.active_index(), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_mixed_signal_sequence() {
    // Five items; initialize → 0; Next ×3 → 3 (optimistic);
    // settle resolves closest-center = 2; Previous → 1; Previous ×5 → 0.
    let mut c = controller(5);
    assert_eq!(c.active_index(), Some(0));

    for _ in 0..3 {
        c.handle(FeedEvent::Navigate(Direction::Next));
    }
    assert_eq!(c.active_index(), Some(3));

    c.handle(FeedEvent::ScrollSample);
    time::advance(Duration::from_millis(200)).await;
    let geometry = FakeGeometry {
        viewport: Some(50.0),
        items: vec![10.0, 30.0, 52.0, 80.0, 105.0],
    };
    assert!(c.poll_settle(&geometry));
    assert_eq!(c.active_index(), Some(2));

    c.handle(FeedEvent::Navigate(Direction::Previous));
    assert_eq!(c.active_index(), Some(1));

    for _ in 0..5 {
        c.handle(FeedEvent::Navigate(Direction::Previous));
    }
    assert_eq!(c.active_index(), Some(0));
}

// ============================================================================
// Visibility Gating
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_visibility_gated_while_scrolling_applied_when_idle() {
    let mut c = controller(5);

    c.handle(FeedEvent::ScrollSample);
    c.handle(FeedEvent::Visibility {
        index: 3,
        intersecting: true,
    });
    assert_eq!(c.active_index(), Some(0), "mid-scroll visibility must not apply");

    time::advance(Duration::from_millis(151)).await;
    let geometry = FakeGeometry {
        viewport: None,
        items: vec![],
    };
    assert!(c.poll_settle(&geometry));

    c.handle(FeedEvent::Visibility {
        index: 3,
        intersecting: true,
    });
    assert_eq!(c.active_index(), Some(3), "idle visibility must apply");
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_navigate_to_current_index_has_no_observable_effect() {
    let mut c = controller(5);
    c.handle(FeedEvent::NavigateTo(2));

    assert_eq!(c.handle(FeedEvent::NavigateTo(2)), None);
    assert_eq!(c.active_index(), Some(2));
}

#[test]
fn test_navigate_past_boundary_emits_no_effect() {
    let mut c = controller(2);
    assert_eq!(
        c.handle(FeedEvent::Navigate(Direction::Next)),
        Some(Effect::ScrollToItem(1))
    );
    assert_eq!(c.handle(FeedEvent::Navigate(Direction::Next)), None);
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_late_timer_and_visibility_after_teardown() {
    let mut c = controller(5);
    c.handle(FeedEvent::ScrollSample);
    c.teardown();

    time::advance(Duration::from_secs(1)).await;
    let geometry = FakeGeometry {
        viewport: Some(0.0),
        items: vec![50.0, 0.0, 50.0, 50.0, 50.0],
    };
    assert!(!c.poll_settle(&geometry), "settle must not fire after teardown");

    c.handle(FeedEvent::Visibility {
        index: 4,
        intersecting: true,
    });
    assert_eq!(c.active_index(), Some(0));
}

// ============================================================================
// End-to-End: App + Viewport
// ============================================================================

fn test_video(id: &str) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        title: format!("Video {id}"),
        description: None,
        url: format!("https://cdn.example.com/{id}.mp4"),
        thumbnail: None,
        duration: Some(30.0),
        created_at: chrono::Utc::now(),
        user: VideoAuthor {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            image: None,
        },
    }
}

fn test_app(ids: &[&str]) -> App {
    let (publisher, _rx) = visibility_channel();
    let mut app = App::new(Config::default(), FeedViewport::new(publisher));
    app.load_initial_page(FeedPage {
        videos: ids.iter().map(|id| test_video(id)).collect(),
        next_cursor: None,
        has_next_page: false,
    });
    app
}

/// Drive navigate → smooth scroll animation → settle, end to end: after
/// the animation lands on the target card and the quiet period passes, the
/// settle resolution confirms (rather than reverts) the optimistic index.
#[tokio::test(start_paused = true)]
async fn test_navigate_then_settle_confirms_target() {
    let mut app = test_app(&["a", "b", "c", "d", "e"]);
    app.viewport.set_layout(10, 5);

    app.dispatch(FeedEvent::Navigate(Direction::Next));
    assert_eq!(app.controller.active_index(), Some(1));

    // Run the animation to completion, reporting each step as a sample.
    while app.viewport.animate_tick() {
        app.dispatch(FeedEvent::ScrollSample);
        time::advance(Duration::from_millis(50)).await;
    }
    assert!(app.controller.is_scroll_in_flight());

    time::advance(Duration::from_millis(151)).await;
    app.poll_settle();

    assert!(!app.controller.is_scroll_in_flight());
    // Card 1 is flush in the viewport, so closest-center agrees with the
    // optimistic update.
    assert_eq!(app.controller.active_index(), Some(1));
}

/// A manual scroll that drags card 3 to the center must win over a stale
/// optimistic navigate once the gesture settles.
#[tokio::test(start_paused = true)]
async fn test_manual_scroll_settles_on_centered_card() {
    let mut app = test_app(&["a", "b", "c", "d", "e"]);
    app.viewport.set_layout(10, 5);

    app.dispatch(FeedEvent::NavigateTo(1));
    assert_eq!(app.controller.active_index(), Some(1));

    // User grabs the wheel: 30 rows down puts card 3 flush in view.
    for _ in 0..10 {
        if app.viewport.scroll_by(3) {
            app.dispatch(FeedEvent::ScrollSample);
        }
        time::advance(Duration::from_millis(20)).await;
    }

    time::advance(Duration::from_millis(151)).await;
    app.poll_settle();
    assert_eq!(app.controller.active_index(), Some(3));
}
