//! The feed controller state machine.
//!
//! Conceptually two states: `Idle` and `ScrollInFlight`. Any scroll sample
//! moves to `ScrollInFlight` (re-arming the settle deadline); deadline
//! expiry moves back to `Idle` and runs the closest-center resolution.
//! Visibility fast-path updates are accepted only in `Idle`.

use super::geometry::ItemGeometry;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Stable identifier for one feed item. The controller never inspects it;
/// it exists so logs and callers can correlate indices with real videos.
pub type ItemId = Arc<str>;

/// Direction for relative navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// One input signal for the reducer. All active-index mutation flows
/// through [`FeedController::handle`] with one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// Programmatic step navigation (keyboard next/previous).
    Navigate(Direction),
    /// Programmatic jump (end-of-playback advance, direct selection).
    NavigateTo(usize),
    /// An item crossed the visibility threshold in the viewport.
    Visibility { index: usize, intersecting: bool },
    /// The feed viewport scroll offset changed (gesture or animation step).
    ScrollSample,
}

/// Side effect requested by the reducer, executed by the rendering layer.
///
/// Scroll effects are fire-and-forget: the controller never learns when the
/// smooth scroll finishes, which is exactly why the settle resolution exists
/// as a correction mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Scroll the feed viewport so the item at this index is in view.
    ScrollToItem(usize),
}

/// Reconciles scroll, visibility, and navigation signals into a single
/// authoritative active index.
///
/// Created when the feed view mounts, torn down when it unmounts. The item
/// sequence is append-only for the lifetime of the controller: pagination
/// may push new items, existing indices never change meaning.
pub struct FeedController {
    items: Vec<ItemId>,
    /// The one active item. `None` iff `items` is empty.
    active: Option<usize>,
    /// `Some` while a scroll gesture is in flight; doubles as the settle
    /// timer (deadline = last sample + quiet period). Cleared on expiry
    /// and on teardown, so no timer can fire after destruction.
    settle_deadline: Option<Instant>,
    quiet_period: Duration,
    /// Visibility update recorded while mid-scroll. Never applied — the
    /// settle resolution supersedes it — kept for tracing only.
    deferred_visibility: Option<usize>,
    torn_down: bool,
}

impl FeedController {
    /// Default quiet period before a scroll is considered settled.
    pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(150);

    pub fn new(quiet_period: Duration) -> Self {
        Self {
            items: Vec::new(),
            active: None,
            settle_deadline: None,
            quiet_period,
            deferred_visibility: None,
            torn_down: false,
        }
    }

    /// Set the item list and reset the active index to 0.
    ///
    /// An empty list is a valid state, not an error: the active index stays
    /// undefined and every navigation event is a no-op until items arrive.
    pub fn initialize(&mut self, items: Vec<ItemId>) {
        self.active = if items.is_empty() { None } else { Some(0) };
        self.items = items;
        self.settle_deadline = None;
        self.deferred_visibility = None;
        tracing::debug!(count = self.items.len(), "Feed controller initialized");
    }

    /// Append paginated items. Existing indices keep their meaning; the
    /// first append into an empty list behaves like `initialize`.
    pub fn append(&mut self, items: Vec<ItemId>) {
        if items.is_empty() {
            return;
        }
        let was_empty = self.items.is_empty();
        self.items.extend(items);
        if was_empty {
            self.active = Some(0);
        }
        tracing::debug!(count = self.items.len(), "Feed items appended");
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current active index. Pure read; `None` for an empty feed.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Id of the active item, for logging and player wiring.
    pub fn active_item(&self) -> Option<&ItemId> {
        self.active.and_then(|i| self.items.get(i))
    }

    /// True while a scroll gesture is in flight (settle timer armed).
    pub fn is_scroll_in_flight(&self) -> bool {
        self.settle_deadline.is_some()
    }

    /// The single arbitration point: apply one input signal, returning the
    /// side effect (if any) the rendering layer should execute.
    ///
    /// Runs to completion synchronously; the event loop guarantees no two
    /// signals interleave.
    pub fn handle(&mut self, event: FeedEvent) -> Option<Effect> {
        if self.torn_down {
            tracing::trace!(?event, "Event after teardown, ignored");
            return None;
        }
        match event {
            FeedEvent::Navigate(direction) => {
                let active = self.active?;
                let target = match direction {
                    Direction::Next => (active + 1).min(self.items.len() - 1),
                    Direction::Previous => active.saturating_sub(1),
                };
                self.navigate_to(target)
            }
            FeedEvent::NavigateTo(index) => {
                self.active?;
                let target = index.min(self.items.len() - 1);
                self.navigate_to(target)
            }
            FeedEvent::Visibility {
                index,
                intersecting,
            } => {
                if !intersecting || index >= self.items.len() {
                    return None;
                }
                if self.is_scroll_in_flight() {
                    // Mid-gesture visibility is untrustworthy: multiple items
                    // cross the threshold during a fast scroll. Record it and
                    // let the settle resolution decide.
                    self.deferred_visibility = Some(index);
                    tracing::trace!(index, "Visibility suppressed during scroll");
                    return None;
                }
                if self.active != Some(index) {
                    tracing::trace!(index, "Active index set via visibility fast path");
                    self.active = Some(index);
                }
                None
            }
            FeedEvent::ScrollSample => {
                // Debounce: each sample cancels and re-arms the deadline.
                self.settle_deadline = Some(Instant::now() + self.quiet_period);
                None
            }
        }
    }

    /// Optimistic jump shared by `Navigate` and `NavigateTo`.
    ///
    /// Already-clamped `target` equal to the current index is a no-op with
    /// no observable effect. Otherwise the active index moves immediately
    /// and a scroll effect is requested; if the physical scroll lands
    /// elsewhere, the next settle resolution corrects us.
    fn navigate_to(&mut self, target: usize) -> Option<Effect> {
        if self.active == Some(target) {
            return None;
        }
        self.active = Some(target);
        Some(Effect::ScrollToItem(target))
    }

    /// Check the settle timer and, if the quiet period has elapsed, run the
    /// closest-center resolution. Returns true when a resolution ran.
    ///
    /// Resolution picks the item whose rendered midpoint is nearest the
    /// viewport midpoint (ties to the lowest index). This is the
    /// authoritative correction that overrides any optimistic index.
    pub fn poll_settle(&mut self, geometry: &dyn ItemGeometry) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(deadline) = self.settle_deadline else {
            return false;
        };
        if Instant::now() < deadline {
            return false;
        }
        self.settle_deadline = None;
        if let Some(index) = self.deferred_visibility.take() {
            tracing::trace!(index, "Discarding visibility recorded mid-scroll");
        }

        let Some(viewport_mid) = geometry.viewport_midpoint() else {
            // Nothing laid out yet; keep whatever index we have.
            return true;
        };
        let mut closest: Option<(usize, f64)> = None;
        for index in 0..self.items.len() {
            let Some(item_mid) = geometry.item_midpoint(index) else {
                continue;
            };
            let distance = (viewport_mid - item_mid).abs();
            // Strict less-than keeps the lowest index on ties.
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((index, distance));
            }
        }
        if let Some((index, distance)) = closest {
            if self.active != Some(index) {
                tracing::debug!(
                    from = ?self.active,
                    to = index,
                    distance,
                    "Settle resolution corrected active index"
                );
            }
            self.active = Some(index);
        }
        true
    }

    /// Release the controller: cancel the pending settle deadline and stop
    /// accepting events. Late timer polls and visibility callbacks after
    /// this point are ignored, never errors.
    pub fn teardown(&mut self) {
        self.settle_deadline = None;
        self.deferred_visibility = None;
        self.torn_down = true;
        tracing::debug!("Feed controller torn down");
    }
}
