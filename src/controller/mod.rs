//! Feed navigation controller.
//!
//! This module owns the "which video is active" decision for the vertical
//! feed. Three independent signal sources compete to move the active index:
//!
//! - **Raw scroll samples** — every offset change of the feed viewport,
//!   whether from a user gesture or a smooth-scroll animation step
//! - **Visibility transitions** — items crossing the half-visible threshold
//! - **Programmatic navigation** — next/previous keys, direct jumps, and
//!   end-of-playback auto-advance
//!
//! All three are funneled through a single reducer ([`FeedController::handle`])
//! so there is exactly one arbitration point. Priority rules:
//!
//! 1. Settled-scroll geometry (closest item midpoint to the viewport
//!    midpoint) is ground truth and runs once scrolling has been quiet for
//!    the configured period.
//! 2. Visibility transitions are a fast path, accepted only while no scroll
//!    gesture is in flight.
//! 3. Programmatic navigation applies optimistically and is subject to
//!    correction by the next settle resolution.
//!
//! # Module Structure
//!
//! - `feed` - The controller state machine and reducer
//! - `geometry` - Capability trait for viewport/item midpoint measurement
//! - `observer` - Channel-backed visibility event publishing

mod feed;
mod geometry;
mod observer;

pub use feed::{Direction, Effect, FeedController, FeedEvent, ItemId};
pub use geometry::ItemGeometry;
pub use observer::{visibility_channel, VisibilityEvent, VisibilityPublisher};
