//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the monitor, the leader
//! loop, and the counter drivers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! Subscribers consume events via [`crate::subscribers::Subscribe`]; the
//! monitor's listener fans each event out to the configured subscriber set.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
