//! Error types used by the countvisor runtime and workers.
//!
//! This module defines three error enums:
//!
//! - [`SegmentError`] — failures around the shared-memory segment.
//! - [`RuntimeError`] — errors raised by the monitoring runtime itself.
//! - [`WorkerError`] — errors raised by worker-process bodies.
//!
//! Election failure is deliberately *not* an error: a process that does not
//! win the leader lock runs as a follower (see [`crate::election`]).

use std::path::PathBuf;
use std::time::Duration;

use nix::errno::Errno;
use thiserror::Error;

/// Errors around creating, attaching, or mapping the shared counter segment.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SegmentError {
    /// The segment could not be created.
    #[error("failed to create segment '{name}': {source}")]
    Create {
        /// Segment name (e.g. `/countvisor`).
        name: String,
        /// Underlying OS error.
        source: Errno,
    },

    /// An existing segment could not be opened.
    #[error("failed to attach segment '{name}': {source}")]
    Attach {
        /// Segment name.
        name: String,
        /// Underlying OS error.
        source: Errno,
    },

    /// The segment could not be sized to hold the counter.
    #[error("failed to size segment '{name}': {source}")]
    Resize {
        /// Segment name.
        name: String,
        /// Underlying OS error.
        source: Errno,
    },

    /// The segment could not be mapped into this process.
    #[error("failed to map segment '{name}': {source}")]
    Map {
        /// Segment name (empty for anonymous mappings).
        name: String,
        /// Underlying OS error.
        source: Errno,
    },
}

impl SegmentError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SegmentError::Create { .. } => "segment_create",
            SegmentError::Attach { .. } => "segment_attach",
            SegmentError::Resize { .. } => "segment_resize",
            SegmentError::Map { .. } => "segment_map",
        }
    }
}

/// Errors produced by the monitoring runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The shared counter segment could not be set up.
    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// The journal stayed unwritable across consecutive snapshot attempts.
    #[error("journal '{}' unwritable after {failures} consecutive attempts", path.display())]
    JournalUnavailable {
        /// Journal file path.
        path: PathBuf,
        /// Number of consecutive failed writes.
        failures: u32,
    },

    /// Shutdown grace period was exceeded; some loops did not stop in time.
    #[error("shutdown grace {grace:?} exceeded; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Segment(_) => "runtime_segment",
            RuntimeError::JournalUnavailable { .. } => "runtime_journal_unavailable",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

/// Errors produced by worker-process bodies.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The worker could not attach the shared counter segment.
    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// The worker could not append its journal records.
    #[error("journal write failed: {0}")]
    Journal(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let err = RuntimeError::GraceExceeded {
            grace: Duration::from_secs(5),
        };
        assert_eq!(err.as_label(), "runtime_grace_exceeded");

        let err = SegmentError::Attach {
            name: "/x".into(),
            source: Errno::ENOENT,
        };
        assert_eq!(err.as_label(), "segment_attach");
    }

    #[test]
    fn segment_error_converts_into_runtime_error() {
        let err: RuntimeError = SegmentError::Create {
            name: "/x".into(),
            source: Errno::EACCES,
        }
        .into();
        assert_eq!(err.as_label(), "runtime_segment");
    }
}
