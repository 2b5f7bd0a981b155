//! # LeaderElector: one-shot, host-wide leader election.
//!
//! Exactly one live process among all cooperating instances becomes the
//! leader. Election is a single non-blocking attempt to take an exclusive
//! advisory lock (`flock`) on a well-known path at startup:
//!
//! - acquisition succeeds → the process is the leader for its whole lifetime;
//! - the lock is held elsewhere → the process runs as a follower, forever
//!   (no retry, no promotion while the current leader is alive);
//! - the lock file cannot even be opened → the process still starts, as a
//!   follower. Leadership is a best-effort optimization, never a correctness
//!   requirement for the counter drivers.
//!
//! The lock is owned by the returned [`LeaderGuard`] and released when the
//! guard drops — or by the OS when the process exits, normal or crash. There
//! is no explicit release call to forget.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use tracing::{debug, warn};

/// Outcome of the startup election attempt.
pub enum Leadership {
    /// This process won the lock and is the leader for its lifetime.
    Leader(LeaderGuard),
    /// Another process holds the lock, or the lock resource was unavailable.
    Follower,
}

impl Leadership {
    /// True if this process is the leader.
    pub fn is_leader(&self) -> bool {
        matches!(self, Leadership::Leader(_))
    }
}

/// Holds the exclusive leader lock for the process's lifetime.
///
/// Dropping the guard releases the lock; so does process exit.
pub struct LeaderGuard {
    _lock: Flock<File>,
}

/// Performs the one-shot leader election against a well-known lock path.
pub struct LeaderElector {
    path: PathBuf,
}

impl LeaderElector {
    /// Creates an elector for the given host-wide lock path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The lock path this elector contends on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Attempts to become the leader. One try, never blocks.
    ///
    /// Any failure — lock held elsewhere, permissions, filesystem trouble —
    /// yields [`Leadership::Follower`]; nothing here is fatal.
    pub fn try_become_leader(&self) -> Leadership {
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "cannot open leader lock; running as follower");
                return Leadership::Follower;
            }
        };

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => {
                debug!(path = %self.path.display(), "leader lock acquired");
                Leadership::Leader(LeaderGuard { _lock: lock })
            }
            Err((_file, Errno::EWOULDBLOCK)) => {
                debug!(path = %self.path.display(), "leader lock held elsewhere; running as follower");
                Leadership::Follower
            }
            Err((_file, errno)) => {
                warn!(path = %self.path.display(), %errno, "leader lock failed; running as follower");
                Leadership::Follower
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_elector_wins_second_follows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("leader.lock");

        let first = LeaderElector::new(&path);
        let second = LeaderElector::new(&path);

        let leadership = first.try_become_leader();
        assert!(leadership.is_leader());

        // flock is per open file description, so a second descriptor in the
        // same process contends like a separate process would.
        assert!(!second.try_become_leader().is_leader());
    }

    #[test]
    fn dropping_the_guard_releases_the_lock() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("leader.lock");
        let elector = LeaderElector::new(&path);

        let leadership = elector.try_become_leader();
        assert!(leadership.is_leader());
        drop(leadership);

        assert!(elector.try_become_leader().is_leader());
    }

    #[test]
    fn exactly_one_of_many_contenders_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("leader.lock");

        // Each thread opens its own descriptor, contending like a separate
        // process would.
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || LeaderElector::new(path).try_become_leader())
            })
            .collect();

        let outcomes: Vec<Leadership> =
            handles.into_iter().map(|h| h.join().expect("join")).collect();
        let leaders = outcomes.iter().filter(|l| l.is_leader()).count();
        assert_eq!(leaders, 1);
    }

    #[test]
    fn unopenable_lock_path_degrades_to_follower() {
        let elector = LeaderElector::new("/nonexistent-dir/countvisor/leader.lock");
        assert!(!elector.try_become_leader().is_leader());
    }
}
