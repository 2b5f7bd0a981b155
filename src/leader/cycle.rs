//! The leader's periodic inspect-and-respawn cycle.
//!
//! Every cycle the leader walks its slot table in fixed order. For each slot:
//!
//! 1. **Parked** — skipped unconditionally (see [`super::slot::SlotState`]).
//! 2. **Running** — non-blocking liveness check:
//!    - still running → journal a skip record, park the slot;
//!    - exited → publish the exit, empty the slot, and fall through;
//! 3. **Empty** — spawn the slot's command. A failed spawn is journaled and
//!    the slot stays empty, eligible again next cycle.
//!
//! Slots are independent; no prioritization exists between them beyond the
//! fixed inspection order.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::events::{Bus, Event, EventKind};
use crate::journal::AppendLog;
use crate::spawn::{ChildStatus, Launch};

use super::slot::{Slot, SlotSpec, SlotState};

/// The leader's table of worker slots.
///
/// Owned exclusively by the leader process; never shared across processes.
pub struct SlotTable {
    slots: Vec<Slot>,
    launcher: Arc<dyn Launch>,
}

impl SlotTable {
    /// Builds a table from slot specifications and a launcher.
    pub fn new(specs: Vec<SlotSpec>, launcher: Arc<dyn Launch>) -> Self {
        Self {
            slots: specs.into_iter().map(Slot::new).collect(),
            launcher,
        }
    }

    /// Number of slots in the table.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Runs one inspection cycle over all slots, in fixed order.
    pub fn cycle(&mut self, journal: &AppendLog, bus: &Bus) {
        let launcher = Arc::clone(&self.launcher);
        for slot in &mut self.slots {
            inspect_slot(slot, journal, bus);
            spawn_if_empty(slot, launcher.as_ref(), journal, bus);
        }
    }
}

/// Resolves a Running slot to Parked or Empty; leaves other states alone.
fn inspect_slot(slot: &mut Slot, journal: &AppendLog, bus: &Bus) {
    let SlotState::Running(child) = &mut slot.state else {
        return;
    };
    let pid = child.id();

    match child.try_wait() {
        Ok(ChildStatus::Running) => {
            let record = format!("{} still running, skipping spawn", slot.spec.name);
            if let Err(error) = journal.append(&record) {
                warn!(slot = %slot.spec.name, %error, "journal append failed");
            }
            bus.publish(
                Event::now(EventKind::WorkerStillRunning)
                    .with_slot(Arc::clone(&slot.spec.name))
                    .with_pid(pid),
            );
            // Skip-once semantics: a slot observed busy is retired for good.
            slot.state = SlotState::Parked;
        }
        Ok(ChildStatus::Exited(code)) => {
            bus.publish(
                Event::now(EventKind::WorkerExited)
                    .with_slot(Arc::clone(&slot.spec.name))
                    .with_pid(pid)
                    .with_value(i64::from(code)),
            );
            slot.state = SlotState::Empty;
        }
        Err(error) => {
            // An unobservable child cannot hold the slot; treat it as gone.
            warn!(slot = %slot.spec.name, pid, %error, "liveness check failed");
            slot.state = SlotState::Empty;
        }
    }
}

/// Spawns into an Empty slot; on failure the slot stays Empty for next cycle.
fn spawn_if_empty(slot: &mut Slot, launcher: &dyn Launch, journal: &AppendLog, bus: &Bus) {
    if !matches!(slot.state, SlotState::Empty) {
        return;
    }

    match launcher.spawn(&slot.spec.command) {
        Ok(child) => {
            bus.publish(
                Event::now(EventKind::WorkerSpawned)
                    .with_slot(Arc::clone(&slot.spec.name))
                    .with_pid(child.id()),
            );
            slot.state = SlotState::Running(child);
        }
        Err(error) => {
            let record = format!("{} spawn failed: {error}", slot.spec.name);
            if let Err(journal_error) = journal.append(&record) {
                warn!(slot = %slot.spec.name, error = %journal_error, "journal append failed");
            }
            bus.publish(
                Event::now(EventKind::SpawnFailed)
                    .with_slot(Arc::clone(&slot.spec.name))
                    .with_reason(error.to_string()),
            );
        }
    }
}

/// Runs the leader cycle every `period` until cancelled.
pub async fn run_leader_loop(
    mut table: SlotTable,
    journal: Arc<AppendLog>,
    bus: Bus,
    period: Duration,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => table.cycle(&journal, &bus),
            _ = token.cancelled() => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::{ChildProc, WorkerCommand};
    use std::collections::VecDeque;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Child whose `try_wait` answers are scripted; the last answer repeats.
    struct FakeChild {
        pid: u32,
        script: VecDeque<ChildStatus>,
        last: ChildStatus,
    }

    impl FakeChild {
        fn scripted(pid: u32, script: Vec<ChildStatus>, last: ChildStatus) -> Self {
            Self {
                pid,
                script: script.into(),
                last,
            }
        }
    }

    impl ChildProc for FakeChild {
        fn id(&self) -> u32 {
            self.pid
        }
        fn try_wait(&mut self) -> io::Result<ChildStatus> {
            Ok(self.script.pop_front().unwrap_or(self.last))
        }
    }

    /// Launcher handing out scripted children, counting spawns per call.
    struct FakeLaunch {
        spawns: AtomicUsize,
        children: Mutex<VecDeque<io::Result<FakeChild>>>,
    }

    impl FakeLaunch {
        fn new(children: Vec<io::Result<FakeChild>>) -> Arc<Self> {
            Arc::new(Self {
                spawns: AtomicUsize::new(0),
                children: Mutex::new(children.into()),
            })
        }

        fn spawn_count(&self) -> usize {
            self.spawns.load(Ordering::SeqCst)
        }
    }

    impl Launch for FakeLaunch {
        fn spawn(&self, _command: &WorkerCommand) -> io::Result<Box<dyn ChildProc>> {
            self.spawns.fetch_add(1, Ordering::SeqCst);
            let next = self
                .children
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::other("script exhausted")));
            next.map(|c| Box::new(c) as Box<dyn ChildProc>)
        }
    }

    fn fixture() -> (Bus, AppendLog, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let journal = AppendLog::new(dir.path().join("log.txt"));
        (Bus::new(64), journal, dir)
    }

    fn spec(name: &str) -> SlotSpec {
        SlotSpec::new(name, WorkerCommand::new("/bin/true"))
    }

    #[tokio::test]
    async fn busy_slot_is_parked_and_never_respawned() {
        let (bus, journal, _dir) = fixture();
        let forever_running =
            FakeChild::scripted(100, vec![], ChildStatus::Running);
        let launcher = FakeLaunch::new(vec![Ok(forever_running)]);
        let mut table = SlotTable::new(vec![spec("Copy1")], launcher.clone());

        // Cycle 1 spawns; cycles 2..6 observe Running once, then skip forever.
        for _ in 0..6 {
            table.cycle(&journal, &bus);
        }

        assert_eq!(launcher.spawn_count(), 1, "a parked slot must never respawn");
        let content = std::fs::read_to_string(journal.path()).expect("read");
        let skips = content
            .lines()
            .filter(|l| l.ends_with("Copy1 still running, skipping spawn"))
            .count();
        assert_eq!(skips, 1, "the skip record is journaled exactly once");
    }

    #[tokio::test]
    async fn exited_child_is_replaced_in_the_same_cycle() {
        let (bus, journal, _dir) = fixture();
        let mut rx = bus.subscribe();
        let exits_fast = FakeChild::scripted(200, vec![], ChildStatus::Exited(0));
        let replacement = FakeChild::scripted(201, vec![], ChildStatus::Running);
        let launcher = FakeLaunch::new(vec![Ok(exits_fast), Ok(replacement)]);
        let mut table = SlotTable::new(vec![spec("Copy2")], launcher.clone());

        table.cycle(&journal, &bus); // spawn #1
        table.cycle(&journal, &bus); // observe exit, spawn #2 immediately

        assert_eq!(launcher.spawn_count(), 2);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::WorkerSpawned,
                EventKind::WorkerExited,
                EventKind::WorkerSpawned,
            ]
        );
    }

    #[tokio::test]
    async fn failed_spawn_leaves_slot_eligible_next_cycle() {
        let (bus, journal, _dir) = fixture();
        let retry_child = FakeChild::scripted(300, vec![], ChildStatus::Running);
        let launcher = FakeLaunch::new(vec![
            Err(io::Error::other("fork bomb protection")),
            Ok(retry_child),
        ]);
        let mut table = SlotTable::new(vec![spec("Copy1")], launcher.clone());

        table.cycle(&journal, &bus); // fails, slot stays Empty
        table.cycle(&journal, &bus); // retried, succeeds

        assert_eq!(launcher.spawn_count(), 2);
        let content = std::fs::read_to_string(journal.path()).expect("read");
        assert!(content.contains("Copy1 spawn failed"));
    }

    #[tokio::test]
    async fn slots_are_inspected_in_fixed_order() {
        let (bus, journal, _dir) = fixture();
        let mut rx = bus.subscribe();
        let a = FakeChild::scripted(1, vec![], ChildStatus::Running);
        let b = FakeChild::scripted(2, vec![], ChildStatus::Running);
        let launcher = FakeLaunch::new(vec![Ok(a), Ok(b)]);
        let mut table = SlotTable::new(vec![spec("Copy1"), spec("Copy2")], launcher);

        table.cycle(&journal, &bus);

        let first = rx.try_recv().expect("event");
        let second = rx.try_recv().expect("event");
        assert_eq!(first.slot.as_deref(), Some("Copy1"));
        assert_eq!(second.slot.as_deref(), Some("Copy2"));
        assert!(first.seq < second.seq);
    }
}
