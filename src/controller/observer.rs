//! Visibility event publishing.
//!
//! The feed view detects items crossing the half-visible threshold and
//! publishes transitions through a channel rather than calling into the
//! controller directly. This keeps the controller's reconciliation logic
//! testable without a rendering surface: tests create a channel and emit
//! synthetic events.

use tokio::sync::mpsc;

/// A single visibility transition for one feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub index: usize,
    pub intersecting: bool,
}

/// Sending half of the visibility stream, owned by the rendering layer.
///
/// `disconnect` severs the stream permanently — events published after
/// teardown are dropped on the floor instead of reaching a controller that
/// no longer exists.
pub struct VisibilityPublisher {
    tx: mpsc::UnboundedSender<VisibilityEvent>,
    connected: bool,
}

/// Create a visibility stream: publisher for the rendering layer, receiver
/// for the event loop to drain into the controller.
pub fn visibility_channel() -> (
    VisibilityPublisher,
    mpsc::UnboundedReceiver<VisibilityEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        VisibilityPublisher {
            tx,
            connected: true,
        },
        rx,
    )
}

impl VisibilityPublisher {
    /// Publish a visibility transition. Silently dropped after disconnect
    /// or when the receiver is gone.
    pub fn publish(&self, index: usize, intersecting: bool) {
        if !self.connected {
            return;
        }
        if self
            .tx
            .send(VisibilityEvent {
                index,
                intersecting,
            })
            .is_err()
        {
            tracing::trace!(index, "Visibility receiver dropped, event discarded");
        }
    }

    /// Permanently stop publishing. Called on feed teardown.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
