//! Capability trait for measuring rendered feed geometry.
//!
//! The controller never touches the rendering surface directly; the settle
//! resolution asks this trait for midpoints and picks the item closest to
//! the viewport center. The TUI feed view implements it from its last
//! layout pass; tests implement it with fixed numbers.

/// Provides viewport and per-item midpoints in a shared coordinate space.
///
/// Units are arbitrary (the TUI uses terminal rows) — only relative
/// distances matter to the closest-center resolution.
pub trait ItemGeometry {
    /// Midpoint of the visible viewport, or `None` when nothing has been
    /// laid out yet (e.g., before the first render).
    fn viewport_midpoint(&self) -> Option<f64>;

    /// Midpoint of the rendered bounds of the item at `index`, in the same
    /// coordinate space as [`viewport_midpoint`](Self::viewport_midpoint).
    /// `None` for indices the surface knows nothing about.
    fn item_midpoint(&self, index: usize) -> Option<f64>;
}
