//! Counter drivers: the two perpetual loops every instance runs.
//!
//! Leadership status does not matter here — leader and followers alike run
//! both drivers against the same shared counter:
//!
//! - [`run_ticker`]: every fixed period, `add(1)`;
//! - [`run_overwrite`]: read integer lines from an input stream and `store`
//!   each one, last writer wins.
//!
//! Both loops honor a [`CancellationToken`] at every suspension point, so a
//! shutdown request stops them at the next sleep or read boundary.

mod overwrite;
mod ticker;

pub use overwrite::run_overwrite;
pub use ticker::run_ticker;
