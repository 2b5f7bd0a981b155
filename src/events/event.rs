//! Runtime events emitted by the monitor, leader loop, and drivers.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata —
//! timestamp, slot name, child PID, counter value, free-form reason. Each
//! event gets a globally unique, monotonically increasing sequence number so
//! consumers can restore order after fan-out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Election ===
    /// This instance won the leader lock.
    LeaderElected,
    /// This instance runs as a follower (lock held elsewhere or unavailable).
    FollowerStarted,

    // === Worker slots (leader only) ===
    /// A worker child was spawned into a slot. Sets `slot`, `pid`.
    WorkerSpawned,
    /// A slot's child was still running at inspection; the slot is parked.
    /// Sets `slot`, `pid`.
    WorkerStillRunning,
    /// A slot's child exited. Sets `slot`, `pid`, `value` (exit code).
    WorkerExited,
    /// Spawning into an empty slot failed; retried next cycle.
    /// Sets `slot`, `reason`.
    SpawnFailed,

    // === Drivers ===
    /// The interactive driver overwrote the counter. Sets `value`.
    CounterOverwritten,
    /// A periodic snapshot append failed. Sets `reason`.
    SnapshotFailed,

    // === Shutdown ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,
    /// All loops stopped within the configured grace period.
    AllStoppedWithin,
    /// Grace period exceeded; some loops did not stop in time.
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Worker slot name, if applicable.
    pub slot: Option<Arc<str>>,
    /// Child process id, if applicable.
    pub pid: Option<u32>,
    /// Counter value or exit code, depending on the kind.
    pub value: Option<i64>,
    /// Human-readable reason (spawn errors, journal errors).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, Ordering::Relaxed),
            at: SystemTime::now(),
            kind,
            slot: None,
            pid: None,
            value: None,
            reason: None,
        }
    }

    /// Attaches a worker slot name.
    #[inline]
    pub fn with_slot(mut self, slot: impl Into<Arc<str>>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Attaches a child process id.
    #[inline]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Attaches a counter value or exit code.
    #[inline]
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_fields() {
        let ev = Event::now(EventKind::WorkerExited)
            .with_slot("Copy1")
            .with_pid(4242)
            .with_value(0);

        assert_eq!(ev.kind, EventKind::WorkerExited);
        assert_eq!(ev.slot.as_deref(), Some("Copy1"));
        assert_eq!(ev.pid, Some(4242));
        assert_eq!(ev.value, Some(0));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::now(EventKind::LeaderElected);
        let b = Event::now(EventKind::FollowerStarted);
        assert!(b.seq > a.seq);
    }
}
