//! Leader-only duties: the worker slot table and the snapshot writer.
//!
//! Only the instance holding the leader lock runs anything in this module.
//! Followers run the counter drivers and nothing else.
//!
//! ## Contents
//! - [`SlotSpec`], [`SlotTable`] — the two reusable worker slots and their
//!   inspect-and-respawn cycle;
//! - [`run_leader_loop`] — the fixed-period cycle driver;
//! - [`run_snapshot_writer`] — periodic `Counter=<value>` journal records.
//!
//! If the leader process terminates, its children are orphaned on purpose:
//! each worker performs a bounded sequence of atomic mutations and exits on
//! its own. Nothing here reaps by force.

mod cycle;
mod slot;
mod snapshot;

pub use cycle::{run_leader_loop, SlotTable};
pub use slot::SlotSpec;
pub use snapshot::run_snapshot_writer;
