//! # Worker bodies: the two ephemeral child-process behaviors.
//!
//! The leader spawns short-lived children into its two slots; each child
//! attaches the shared segment, performs one bounded sequence of atomic
//! mutations, journals its start and end, and terminates. Workers never block
//! indefinitely and never need cancellation.
//!
//! - **Copy1**: a single `add(10)`.
//! - **Copy2**: CAS-loop double, pause, CAS-loop halve. The halve applies to
//!   whatever the counter holds *after* the pause — the ticker, the overwrite
//!   driver, and Copy1 all may have mutated it meanwhile, so the net effect
//!   depends on that interleaving. With interference `d` during the pause the
//!   result is `(2v + d) / 2` in `i64` division (truncating toward zero).
//!
//! A collaborator binary dispatches on [`WorkerKind`] and calls
//! [`run_worker`], which does the segment/journal attachment.

use std::io;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;
use crate::counter::SharedCounter;
use crate::error::WorkerError;
use crate::journal::AppendLog;

/// Which worker body a child process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerKind {
    /// Single `add(10)`.
    Copy1,
    /// Double, pause, halve.
    Copy2,
}

impl WorkerKind {
    /// Stable lowercase name, suitable as a spawn argument.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerKind::Copy1 => "copy1",
            WorkerKind::Copy2 => "copy2",
        }
    }

    /// Slot/journal label (`Copy1`/`Copy2`).
    pub fn label(&self) -> &'static str {
        match self {
            WorkerKind::Copy1 => "Copy1",
            WorkerKind::Copy2 => "Copy2",
        }
    }
}

impl FromStr for WorkerKind {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy1" => Ok(WorkerKind::Copy1),
            "copy2" => Ok(WorkerKind::Copy2),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown worker kind '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full child-process entry point: attach the shared segment and journal from
/// `config`, run the requested body, exit.
pub async fn run_worker(kind: WorkerKind, config: &Config) -> Result<(), WorkerError> {
    let counter = SharedCounter::open(&config.segment_name)?;
    let journal = AppendLog::new(&config.journal_path);
    match kind {
        WorkerKind::Copy1 => run_copy1(&counter, &journal)?,
        WorkerKind::Copy2 => run_copy2(&counter, &journal, config.worker_pause).await?,
    }
    Ok(())
}

/// Copy1: journal start, one atomic `add(10)`, journal end.
pub fn run_copy1(counter: &SharedCounter, journal: &AppendLog) -> io::Result<()> {
    journal.append("Copy1 start")?;
    counter.add(10);
    journal.append("Copy1 end")
}

/// Copy2: journal start, CAS-double, pause, CAS-halve the *current* value,
/// journal end.
pub async fn run_copy2(
    counter: &SharedCounter,
    journal: &AppendLog,
    pause: Duration,
) -> io::Result<()> {
    journal.append("Copy2 start")?;
    counter.update(|v| v.wrapping_mul(2));
    tokio::time::sleep(pause).await;
    counter.update(|v| v / 2);
    journal.append("Copy2 end")
}
