//! Worker slot state.

use std::sync::Arc;

use crate::spawn::{ChildProc, WorkerCommand};

/// Specification of one worker slot: a stable name and the command the
/// leader spawns into it.
#[derive(Debug, Clone)]
pub struct SlotSpec {
    /// Slot name, used in journal records and events (e.g. `Copy1`).
    pub name: Arc<str>,
    /// Command spawned whenever the slot is empty.
    pub command: WorkerCommand,
}

impl SlotSpec {
    /// Creates a slot specification.
    pub fn new(name: impl Into<Arc<str>>, command: WorkerCommand) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }
}

/// Lifecycle of one slot.
///
/// `Empty → Running → (Exited → Empty | StillRunning → Parked)`.
///
/// Parked is terminal: once a liveness check finds the previous child still
/// running, the slot is skipped on every later cycle and never spawned into
/// again for the remainder of this leader's life. See DESIGN.md for why the
/// slot is retired rather than re-checked.
pub(crate) enum SlotState {
    /// No child; eligible for a spawn this cycle.
    Empty,
    /// A child was spawned and has not been observed exited yet.
    Running(Box<dyn ChildProc>),
    /// A child was observed still running once; the slot is retired.
    Parked,
}

/// One worker slot owned by the leader.
pub(crate) struct Slot {
    pub(crate) spec: SlotSpec,
    pub(crate) state: SlotState,
}

impl Slot {
    pub(crate) fn new(spec: SlotSpec) -> Self {
        Self {
            spec,
            state: SlotState::Empty,
        }
    }
}
