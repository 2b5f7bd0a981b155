//! Broadcast bus for runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]: publishers
//! (leader loop, drivers, the monitor) never block, and slow receivers lag
//! rather than backpressure the runtime.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` calls `broadcast::Sender::send`.
//! - **Bounded capacity**: one ring buffer stores recent events for all
//!   receivers; receivers that fall behind observe `RecvError::Lagged(n)`.
//! - **No persistence**: events sent while nobody listens are dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone; multiple publishers can publish concurrently and each
/// subscriber receives its own clone of every event.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to ≥ 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active subscribers; never blocks.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates an independent receiver observing subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
