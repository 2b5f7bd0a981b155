//! Runtime orchestration: the [`Monitor`] and OS signal handling.
//!
//! [`Monitor`] is the per-instance entry point; [`shutdown`] provides the
//! signal listener that triggers graceful cancellation.

mod monitor;
pub(crate) mod shutdown;

pub use monitor::Monitor;
