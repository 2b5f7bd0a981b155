//! # countvisor
//!
//! **Countvisor** coordinates several processes around one shared counter.
//!
//! Every instance of the program maps the same POSIX shared-memory cell and
//! drives it concurrently; exactly one instance — chosen by a non-blocking
//! advisory file lock — also acts as the **leader**, periodically snapshotting
//! the counter to a shared append-only journal and supervising two slots of
//! short-lived worker processes.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        instance A (leader)          instance B (follower)    ...
//! ┌─────────────────────────────┐  ┌─────────────────────────┐
//! │ Monitor                     │  │ Monitor                 │
//! │  - Bus (broadcast events)   │  │  - Bus                  │
//! │  - SubscriberSet (fan-out)  │  │  - SubscriberSet        │
//! │  - LeaderGuard (file lock)  │  │  (election: Follower)   │
//! ├─────────────────────────────┤  ├─────────────────────────┤
//! │ run_ticker     (300 ms +1)  │  │ run_ticker              │
//! │ run_overwrite  (stdin →=)   │  │ run_overwrite           │
//! │ run_snapshot_writer (1 s)   │  └───────────┬─────────────┘
//! │ run_leader_loop     (3 s)   │              │
//! └──────┬───────────────┬──────┘              │
//!        ▼               ▼                     │
//!   ┌─────────┐     ┌─────────┐                │
//!   │  Copy1  │     │  Copy2  │   (spawned child processes)
//!   │  (+10)  │     │ (×2 ÷2) │                │
//!   └────┬────┘     └────┬────┘                │
//!        ▼               ▼                     ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │        SharedCounter — one AtomicI64 in shm_open segment  │
//! └───────────────────────────────────────────────────────────┘
//!        │  every process also appends to:
//!        ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  AppendLog — [YYYY-MM-DD HH:MM:SS.mmm] PID=<pid> <msg>    │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Leader cycle (every 3 s, fixed slot order)
//! ```text
//! for slot in [Copy1, Copy2] {
//!   ├─ Running(child) ─► try_wait
//!   │     ├─ Exited  ──► publish WorkerExited, slot ← Empty
//!   │     └─ Running ──► journal "<name> still running, skipping spawn",
//!   │                    slot ← Parked            (permanent: never respawned)
//!   ├─ Empty ──► launcher.spawn
//!   │     ├─ Ok  ──► publish WorkerSpawned, slot ← Running(child)
//!   │     └─ Err ──► journal + publish SpawnFailed, retry next cycle
//!   └─ Parked ──► skip
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                             | Key types / functions                      |
//! |-----------------|---------------------------------------------------------|--------------------------------------------|
//! | **Counter**     | One shared `AtomicI64` in named or anonymous shm.       | [`SharedCounter`]                           |
//! | **Election**    | One non-blocking attempt on an advisory file lock.      | [`LeaderElector`], [`Leadership`]           |
//! | **Journal**     | Timestamped, PID-stamped append-only shared log.        | [`AppendLog`]                               |
//! | **Drivers**     | Periodic increment + interactive overwrite, per instance.| [`run_ticker`], [`run_overwrite`]          |
//! | **Leader**      | Slot supervision and periodic counter snapshots.        | [`SlotTable`], [`run_leader_loop`]          |
//! | **Workers**     | The two child-process bodies.                           | [`WorkerKind`], [`run_worker`]              |
//! | **Spawn seam**  | Pluggable process launcher for the leader loop.         | [`Launch`], [`ProcessLauncher`]             |
//! | **Events**      | Broadcast lifecycle events and subscriber fan-out.      | [`Bus`], [`Event`], [`Subscribe`]           |
//! | **Runtime**     | Wires everything together; graceful shutdown.           | [`Monitor`], [`Config`]                     |
//!
//! ## Example
//! ```rust,no_run
//! use countvisor::{Config, Monitor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default().with_worker_binary("/usr/local/bin/countvisor-worker");
//!     Monitor::new(cfg).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! Unix only: the counter lives in `shm_open` shared memory and the election
//! uses `flock`.

mod config;
mod counter;
mod drivers;
mod election;
mod error;
mod events;
mod journal;
mod leader;
mod runtime;
mod spawn;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use config::Config;
pub use counter::SharedCounter;
pub use drivers::{run_overwrite, run_ticker};
pub use election::{LeaderElector, LeaderGuard, Leadership};
pub use error::{RuntimeError, SegmentError, WorkerError};
pub use events::{Bus, Event, EventKind};
pub use journal::AppendLog;
pub use leader::{run_leader_loop, run_snapshot_writer, SlotSpec, SlotTable};
pub use runtime::Monitor;
pub use spawn::{ChildProc, ChildStatus, Launch, ProcessLauncher, WorkerCommand};
pub use subscribers::{Subscribe, SubscriberSet, TraceWriter};
pub use workers::{run_copy1, run_copy2, run_worker, WorkerKind};
