//! Event subscribers: the fan-out seam for observability.
//!
//! A [`Subscribe`] implementation receives every runtime [`Event`] the
//! monitor's listener pulls off the bus. Subscribers run on the listener
//! task, one after another — keep `on_event` fast and non-blocking.
//!
//! [`TraceWriter`] is the built-in subscriber that mirrors events into
//! `tracing` spans of appropriate severity.

mod set;
mod trace;

pub use set::SubscriberSet;
pub use trace::TraceWriter;

use async_trait::async_trait;

use crate::events::Event;

/// Receives runtime events fanned out by the monitor.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Stable subscriber name for diagnostics.
    fn name(&self) -> &'static str {
        "subscriber"
    }

    /// Handles one event. Called sequentially per listener.
    async fn on_event(&self, event: &Event);
}
