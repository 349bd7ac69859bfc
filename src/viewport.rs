//! Feed viewport: the scroll surface the controller reasons about.
//!
//! Each video renders as one full-height card; the viewport owns the scroll
//! offset (in terminal rows), animates smooth scrolling toward a target
//! card, measures midpoints for the controller's closest-center resolution,
//! and publishes half-visible transitions through the visibility channel.
//!
//! The smooth scroll is fire-and-forget from the controller's perspective:
//! every animation step is reported back as a raw scroll sample, so the
//! settle resolution runs after the animation (or the user's gesture)
//! quiets down.

use crate::controller::{ItemGeometry, VisibilityPublisher};

/// Fraction of a card that must be inside the viewport for the item to
/// count as intersecting.
const VISIBILITY_THRESHOLD: f64 = 0.5;

pub struct FeedViewport {
    /// Scroll offset of the content in rows (0 = first card flush at top).
    offset: usize,
    /// Row offset a smooth scroll is animating toward.
    target: Option<usize>,
    /// Rows per card. Cards are viewport-height, so this equals
    /// `viewport_rows` after the first layout.
    item_height: usize,
    viewport_rows: usize,
    item_count: usize,
    /// Last published intersecting state per item.
    visible: Vec<bool>,
    publisher: VisibilityPublisher,
}

impl FeedViewport {
    pub fn new(publisher: VisibilityPublisher) -> Self {
        Self {
            offset: 0,
            target: None,
            item_height: 0,
            viewport_rows: 0,
            item_count: 0,
            visible: Vec::new(),
            publisher,
        }
    }

    /// Record the layout for this frame. Called on every render so terminal
    /// resizes and appended pages are picked up; clamps the offset and
    /// republishes visibility transitions against the new geometry.
    pub fn set_layout(&mut self, viewport_rows: usize, item_count: usize) {
        let rows = viewport_rows.max(1);
        if rows != self.viewport_rows {
            // Keep the same card anchored across a resize.
            let anchor = if self.item_height > 0 {
                self.offset / self.item_height
            } else {
                0
            };
            self.viewport_rows = rows;
            self.item_height = rows;
            self.offset = anchor * self.item_height;
            self.target = self.target.map(|_| self.offset); // Re-anchor, ends animation
        }
        self.item_count = item_count;
        self.visible.resize(item_count, false);
        self.offset = self.offset.min(self.max_offset());
        self.update_visibility();
    }

    fn max_offset(&self) -> usize {
        self.item_height * self.item_count.saturating_sub(1)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn item_height(&self) -> usize {
        self.item_height
    }

    /// Screen-space top row of the card at `index` (may be negative when
    /// the card is above the viewport).
    pub fn item_top(&self, index: usize) -> isize {
        (index * self.item_height) as isize - self.offset as isize
    }

    /// Begin a smooth scroll so the card at `index` snaps to the top.
    /// Executes the controller's `ScrollToItem` effect.
    pub fn scroll_to(&mut self, index: usize) {
        if self.item_height == 0 {
            // Not laid out yet; first layout will land on offset 0 anyway.
            return;
        }
        let index = index.min(self.item_count.saturating_sub(1));
        self.target = Some(index * self.item_height);
    }

    /// Manual scroll gesture by `delta` rows. Cancels any in-flight smooth
    /// scroll, the way a wheel event interrupts a browser's smooth scroll.
    /// Returns true when the offset actually moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        self.target = None;
        let before = self.offset;
        let next = self.offset as isize + delta;
        self.offset = next.clamp(0, self.max_offset() as isize) as usize;
        if self.offset != before {
            self.update_visibility();
            true
        } else {
            false
        }
    }

    /// Advance the smooth-scroll animation one tick. Returns true when the
    /// offset moved (the caller reports it as a scroll sample).
    pub fn animate_tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        if self.offset == target {
            self.target = None;
            return false;
        }
        let distance = target.abs_diff(self.offset);
        // Ease out: cover a third of the remaining distance, at least 1 row.
        let step = (distance / 3).max(1);
        if target > self.offset {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        if self.offset == target {
            self.target = None;
        }
        self.update_visibility();
        true
    }

    /// Visible row fraction of the card at `index`.
    fn visible_fraction(&self, index: usize) -> f64 {
        if self.item_height == 0 {
            return 0.0;
        }
        let top = self.item_top(index);
        let bottom = top + self.item_height as isize;
        let overlap = bottom.min(self.viewport_rows as isize) - top.max(0);
        overlap.max(0) as f64 / self.item_height as f64
    }

    /// Diff per-item visibility against the last published state and emit
    /// transitions. The controller decides whether to trust them.
    fn update_visibility(&mut self) {
        for index in 0..self.item_count {
            let intersecting = self.visible_fraction(index) >= VISIBILITY_THRESHOLD;
            if self.visible[index] != intersecting {
                self.visible[index] = intersecting;
                self.publisher.publish(index, intersecting);
            }
        }
    }

    /// Sever the visibility stream. Called on unmount, after which no
    /// further events reach the controller.
    pub fn teardown(&mut self) {
        self.publisher.disconnect();
        self.target = None;
    }
}

impl ItemGeometry for FeedViewport {
    fn viewport_midpoint(&self) -> Option<f64> {
        if self.viewport_rows == 0 || self.item_count == 0 {
            return None;
        }
        Some(self.viewport_rows as f64 / 2.0)
    }

    fn item_midpoint(&self, index: usize) -> Option<f64> {
        if index >= self.item_count || self.item_height == 0 {
            return None;
        }
        Some(self.item_top(index) as f64 + self.item_height as f64 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::visibility_channel;

    fn viewport() -> (
        FeedViewport,
        tokio::sync::mpsc::UnboundedReceiver<crate::controller::VisibilityEvent>,
    ) {
        let (publisher, rx) = visibility_channel();
        (FeedViewport::new(publisher), rx)
    }

    #[tokio::test]
    async fn test_layout_publishes_initial_visibility() {
        let (mut vp, mut rx) = viewport();
        vp.set_layout(20, 3);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.index, 0);
        assert!(event.intersecting);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_scroll_transition_emits_events_for_both_items() {
        let (mut vp, mut rx) = viewport();
        vp.set_layout(20, 3);
        let _ = rx.try_recv();

        // Past the halfway point of card 1, item 0 leaves and item 1 enters.
        assert!(vp.scroll_by(11));

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push((event.index, event.intersecting));
        }
        assert!(seen.contains(&(0, false)));
        assert!(seen.contains(&(1, true)));
    }

    #[tokio::test]
    async fn test_animation_reaches_target_and_stops() {
        let (mut vp, _rx) = viewport();
        vp.set_layout(10, 5);
        vp.scroll_to(3);

        let mut ticks = 0;
        while vp.animate_tick() {
            ticks += 1;
            assert!(ticks < 100, "animation did not converge");
        }
        assert_eq!(vp.offset(), 30);
        assert!(!vp.animate_tick()); // Settled, no further movement
    }

    #[tokio::test]
    async fn test_manual_scroll_cancels_animation() {
        let (mut vp, _rx) = viewport();
        vp.set_layout(10, 5);
        vp.scroll_to(4);
        assert!(vp.animate_tick());

        vp.scroll_by(-1);
        let offset = vp.offset();
        assert!(!vp.animate_tick()); // Target cleared
        assert_eq!(vp.offset(), offset);
    }

    #[tokio::test]
    async fn test_scroll_clamps_to_content_bounds() {
        let (mut vp, _rx) = viewport();
        vp.set_layout(10, 3);
        assert!(!vp.scroll_by(-5)); // Already at top
        vp.scroll_by(1000);
        assert_eq!(vp.offset(), 20); // Last card flush at top
    }

    #[tokio::test]
    async fn test_geometry_midpoints() {
        let (mut vp, _rx) = viewport();
        vp.set_layout(10, 3);
        assert_eq!(vp.viewport_midpoint(), Some(5.0));
        assert_eq!(vp.item_midpoint(0), Some(5.0));
        assert_eq!(vp.item_midpoint(1), Some(15.0));
        assert_eq!(vp.item_midpoint(7), None);

        vp.scroll_by(10);
        assert_eq!(vp.item_midpoint(1), Some(5.0)); // Card 1 now centered
    }

    #[tokio::test]
    async fn test_empty_layout_has_no_geometry() {
        let (mut vp, _rx) = viewport();
        vp.set_layout(10, 0);
        assert_eq!(vp.viewport_midpoint(), None);
        assert_eq!(vp.item_midpoint(0), None);
    }
}
