//! Global runtime configuration.
//!
//! [`Config`] centralizes the well-known names every cooperating process must
//! agree on (segment name, lock path, journal path) and the fixed periods of
//! the runtime loops. Defaults match the documented cadence: tick every
//! 300 ms, leader cycle every 3 s, snapshot every 1 s, worker pause 2 s.
//!
//! Slots default to empty — a leader with no slot specs spawns nothing. Use
//! [`Config::with_worker_binary`] to wire the standard `Copy1`/`Copy2` pair
//! to a collaborator binary.

use std::path::PathBuf;
use std::time::Duration;

use crate::leader::SlotSpec;
use crate::spawn::WorkerCommand;

/// Configuration shared by the monitor runtime and worker entry points.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared-memory segment name, leading slash included.
    pub segment_name: String,

    /// Host-wide leader lock path.
    pub lock_path: PathBuf,

    /// Append-only journal path, shared by all cooperating processes.
    pub journal_path: PathBuf,

    /// Period of the incrementer driver.
    pub tick_period: Duration,

    /// Period of the leader's slot inspection cycle.
    pub cycle_period: Duration,

    /// Period of the leader's counter snapshot records.
    pub snapshot_period: Duration,

    /// Pause between Copy2's double and halve steps.
    pub worker_pause: Duration,

    /// Maximum wait for loops to stop after a shutdown request.
    pub grace: Duration,

    /// Event bus ring buffer capacity (clamped to ≥ 1 by the bus).
    pub bus_capacity: usize,

    /// Worker slots the leader manages, in inspection order.
    pub slots: Vec<SlotSpec>,
}

impl Config {
    /// Replaces the slot table with the standard `Copy1`/`Copy2` pair, each
    /// invoking `worker_binary` with the worker kind as its sole argument.
    pub fn with_worker_binary(mut self, worker_binary: impl Into<PathBuf>) -> Self {
        let program = worker_binary.into();
        self.slots = vec![
            SlotSpec::new("Copy1", WorkerCommand::new(&program).arg("copy1")),
            SlotSpec::new("Copy2", WorkerCommand::new(&program).arg("copy2")),
        ];
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segment_name: "/countvisor".to_string(),
            lock_path: PathBuf::from("/tmp/countvisor.leader.lock"),
            journal_path: PathBuf::from("log.txt"),
            tick_period: Duration::from_millis(300),
            cycle_period: Duration::from_secs(3),
            snapshot_period: Duration::from_secs(1),
            worker_pause: Duration::from_secs(2),
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
            slots: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_cadence() {
        let cfg = Config::default();
        assert_eq!(cfg.tick_period, Duration::from_millis(300));
        assert_eq!(cfg.cycle_period, Duration::from_secs(3));
        assert_eq!(cfg.snapshot_period, Duration::from_secs(1));
        assert_eq!(cfg.worker_pause, Duration::from_secs(2));
        assert!(cfg.segment_name.starts_with('/'));
        assert!(cfg.slots.is_empty());
    }

    #[test]
    fn with_worker_binary_builds_the_standard_pair() {
        let cfg = Config::default().with_worker_binary("/usr/bin/countvisor-worker");
        assert_eq!(cfg.slots.len(), 2);
        assert_eq!(&*cfg.slots[0].name, "Copy1");
        assert_eq!(cfg.slots[0].command.args, vec!["copy1".to_string()]);
        assert_eq!(&*cfg.slots[1].name, "Copy2");
        assert_eq!(cfg.slots[1].command.args, vec!["copy2".to_string()]);
    }
}
