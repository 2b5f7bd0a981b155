//! Sequential fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] delivers each event to every subscriber in registration
//! order. Delivery happens on the monitor's listener task; the broadcast bus
//! already decouples publishers from this, so a slow subscriber delays its
//! peers but never the runtime loops.

use std::sync::Arc;

use crate::events::Event;

use super::Subscribe;

/// Ordered collection of subscribers sharing one delivery task.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers.
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Delivers one event to every subscriber, in order.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            sub.on_event(event).await;
        }
    }

    /// True if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSub(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for CountingSub {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn emit_reaches_every_subscriber() {
        let seen_a = Arc::new(AtomicUsize::new(0));
        let seen_b = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(vec![
            Arc::new(CountingSub(Arc::clone(&seen_a))),
            Arc::new(CountingSub(Arc::clone(&seen_b))),
        ]);
        assert_eq!(set.len(), 2);

        set.emit(&Event::now(EventKind::LeaderElected)).await;
        set.emit(&Event::now(EventKind::ShutdownRequested)).await;

        assert_eq!(seen_a.load(Ordering::SeqCst), 2);
        assert_eq!(seen_b.load(Ordering::SeqCst), 2);
    }
}
