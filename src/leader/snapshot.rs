//! Periodic counter snapshot writer (leader only).

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::counter::SharedCounter;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::journal::AppendLog;

/// Consecutive journal failures tolerated before the writer gives up.
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Appends a `Counter=<value>` record every `period` until cancelled.
///
/// A transient journal failure is logged and tolerated; the failure counter
/// resets on the next successful append. Once the journal stays unwritable
/// for [`MAX_CONSECUTIVE_FAILURES`] periods in a row, the writer terminates
/// with [`RuntimeError::JournalUnavailable`] — the rest of the runtime keeps
/// going.
pub async fn run_snapshot_writer(
    counter: SharedCounter,
    journal: Arc<AppendLog>,
    bus: Bus,
    period: Duration,
    token: CancellationToken,
) -> Result<(), RuntimeError> {
    let mut consecutive_failures = 0u32;
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                let value = counter.get();
                match journal.append(&format!("Counter={value}")) {
                    Ok(()) => consecutive_failures = 0,
                    Err(error) => {
                        consecutive_failures += 1;
                        warn!(%error, consecutive_failures, "snapshot append failed");
                        bus.publish(
                            Event::now(EventKind::SnapshotFailed)
                                .with_value(value)
                                .with_reason(error.to_string()),
                        );
                        if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                            return Err(RuntimeError::JournalUnavailable {
                                path: journal.path().to_path_buf(),
                                failures: consecutive_failures,
                            });
                        }
                    }
                }
            }
            _ = token.cancelled() => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn snapshots_record_the_current_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let counter = SharedCounter::anonymous().expect("counter");
        let journal = Arc::new(AppendLog::new(dir.path().join("log.txt")));
        let bus = Bus::new(16);
        let token = CancellationToken::new();

        counter.store(11);
        let handle = tokio::spawn(run_snapshot_writer(
            counter.clone(),
            Arc::clone(&journal),
            bus,
            Duration::from_secs(1),
            token.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        counter.store(23);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        token.cancel();
        handle.await.expect("join").expect("writer result");

        let content = std::fs::read_to_string(journal.path()).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2, "snapshots at 1s and 2s: {content}");
        assert!(lines[0].ends_with("Counter=11"));
        assert!(lines[1].ends_with("Counter=23"));
        assert!(lines[0].contains(&format!("PID={}", std::process::id())));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_journal_failure_terminates_the_writer() {
        // A directory path is never writable as a file.
        let dir = tempfile::tempdir().expect("tempdir");
        let counter = SharedCounter::anonymous().expect("counter");
        let journal = Arc::new(AppendLog::new(dir.path()));
        let bus = Bus::new(16);

        let result = tokio::time::timeout(
            Duration::from_secs(30),
            run_snapshot_writer(
                counter,
                journal,
                bus,
                Duration::from_secs(1),
                CancellationToken::new(),
            ),
        )
        .await
        .expect("writer must give up, not spin");

        match result {
            Err(RuntimeError::JournalUnavailable { failures, .. }) => {
                assert_eq!(failures, MAX_CONSECUTIVE_FAILURES);
            }
            other => panic!("expected JournalUnavailable, got {other:?}"),
        }
    }
}
