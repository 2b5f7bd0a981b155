//! # SharedCounter: one atomic integer shared across processes.
//!
//! [`SharedCounter`] is a handle to a single `AtomicI64` living in a named
//! POSIX shared-memory segment. Every cooperating process opens the same name;
//! the first one creates the segment (counter starts at 0), the rest attach to
//! it. Handles are cheap to clone and safe to share across threads.
//!
//! ## Access rules
//! The counter is mutated by many threads in many processes concurrently, so
//! every mutation goes through an atomic primitive:
//! - [`get`](SharedCounter::get) — atomic load, never blocks;
//! - [`add`](SharedCounter::add) — atomic fetch-and-add;
//! - [`store`](SharedCounter::store) — atomic store, last writer wins;
//! - [`update`](SharedCounter::update) — compare-and-swap retry loop applying
//!   a pure transform.
//!
//! There is no load-compute-store path: composing a read and a write without
//! [`update`] would race against the other mutators.
//!
//! ## Lifetime
//! The segment outlives any single process that maps it. Dropping the last
//! handle in a process unmaps the view; the segment itself persists until
//! [`SharedCounter::unlink`] or reboot.

mod segment;

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::error::SegmentError;

use segment::Mapping;

/// Handle to the shared atomic counter.
///
/// Clones share the same mapping within a process; handles in different
/// processes share the same segment.
#[derive(Clone)]
pub struct SharedCounter {
    map: Arc<Mapping>,
}

impl SharedCounter {
    /// Creates or attaches the named segment (name should start with `/`).
    ///
    /// The creating process finds the counter zero-initialized; attaching
    /// processes see the current value and never reinitialize it.
    pub fn open(name: &str) -> Result<Self, SegmentError> {
        let map = Mapping::open_named(name)?;
        Ok(Self { map: Arc::new(map) })
    }

    /// Creates a process-private counter with identical semantics.
    ///
    /// Useful for tests and embedders that do not need cross-process sharing.
    pub fn anonymous() -> Result<Self, SegmentError> {
        let map = Mapping::open_anonymous()?;
        Ok(Self { map: Arc::new(map) })
    }

    /// Removes the named segment from the system.
    ///
    /// Existing mappings stay valid; the next [`open`](SharedCounter::open)
    /// with this name creates a fresh zeroed segment.
    pub fn unlink(name: &str) -> std::io::Result<()> {
        segment::unlink_named(name)
    }

    /// True if this handle created the segment rather than attaching to it.
    pub fn is_creator(&self) -> bool {
        self.map.created()
    }

    /// Atomic load of the current value.
    pub fn get(&self) -> i64 {
        self.cell().load(Ordering::SeqCst)
    }

    /// Atomic fetch-and-add; returns the value *before* the addition.
    pub fn add(&self, delta: i64) -> i64 {
        self.cell().fetch_add(delta, Ordering::SeqCst)
    }

    /// Atomic store; last writer wins relative to concurrent mutations.
    pub fn store(&self, value: i64) {
        self.cell().store(value, Ordering::SeqCst)
    }

    /// Compare-and-swap retry loop: atomically replaces the value with
    /// `transform(current)`, retrying until no concurrent mutation interferes.
    ///
    /// `transform` must be pure — it may run several times under contention.
    /// Returns `(old, new)` for the attempt that won.
    pub fn update<F>(&self, transform: F) -> (i64, i64)
    where
        F: Fn(i64) -> i64,
    {
        let cell = self.cell();
        let mut current = cell.load(Ordering::SeqCst);
        loop {
            let next = transform(current);
            match cell.compare_exchange_weak(current, next, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return (current, next),
                Err(observed) => current = observed,
            }
        }
    }

    fn cell(&self) -> &AtomicI64 {
        self.map.cell()
    }
}

impl std::fmt::Debug for SharedCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCounter")
            .field("value", &self.get())
            .field("creator", &self.is_creator())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread;

    static NEXT_SEGMENT: AtomicU32 = AtomicU32::new(0);

    fn unique_name() -> String {
        format!(
            "/countvisor-test-{}-{}",
            std::process::id(),
            NEXT_SEGMENT.fetch_add(1, Ordering::Relaxed)
        )
    }

    #[test]
    fn anonymous_counter_basic_ops() {
        let counter = SharedCounter::anonymous().expect("anonymous mapping");
        assert_eq!(counter.get(), 0);

        assert_eq!(counter.add(5), 0);
        assert_eq!(counter.get(), 5);

        counter.store(-3);
        assert_eq!(counter.get(), -3);

        let (old, new) = counter.update(|v| v * 2);
        assert_eq!((old, new), (-3, -6));
        assert_eq!(counter.get(), -6);
    }

    #[test]
    fn update_truncates_toward_zero_on_halving() {
        let counter = SharedCounter::anonymous().expect("anonymous mapping");

        counter.store(7);
        counter.update(|v| v / 2);
        assert_eq!(counter.get(), 3);

        counter.store(-7);
        counter.update(|v| v / 2);
        assert_eq!(counter.get(), -3);
    }

    #[test]
    fn named_segment_create_then_attach() {
        let name = unique_name();

        let creator = SharedCounter::open(&name).expect("create segment");
        assert!(creator.is_creator());
        assert_eq!(creator.get(), 0);
        creator.store(42);

        let attacher = SharedCounter::open(&name).expect("attach segment");
        assert!(!attacher.is_creator());
        assert_eq!(attacher.get(), 42, "attach must not reinitialize");

        attacher.add(1);
        assert_eq!(creator.get(), 43, "both handles see the same cell");

        SharedCounter::unlink(&name).expect("unlink");
    }

    #[test]
    fn unlinked_name_creates_a_fresh_segment() {
        let name = unique_name();

        let first = SharedCounter::open(&name).expect("create");
        first.store(99);
        SharedCounter::unlink(&name).expect("unlink");

        let second = SharedCounter::open(&name).expect("recreate");
        assert!(second.is_creator());
        assert_eq!(second.get(), 0);
        assert_eq!(first.get(), 99, "old mapping stays valid after unlink");

        SharedCounter::unlink(&name).expect("unlink again");
    }

    #[test]
    fn concurrent_adds_linearize() {
        let counter = SharedCounter::anonymous().expect("anonymous mapping");
        let threads = 8;
        let per_thread = 1_000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        counter.add(1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("join");
        }

        assert_eq!(counter.get(), (threads * per_thread) as i64);
    }

    #[test]
    fn contended_update_applies_each_transform_once() {
        let counter = SharedCounter::anonymous().expect("anonymous mapping");
        let threads = 8;
        let per_thread = 500;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        counter.update(|v| v + 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("join");
        }

        assert_eq!(counter.get(), (threads * per_thread) as i64);
    }
}
