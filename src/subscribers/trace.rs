//! Built-in subscriber mirroring runtime events into `tracing`.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Logs every runtime event through `tracing` at a severity matching its kind.
///
/// Election and shutdown milestones are `info`, worker lifecycle is `debug`,
/// failures are `warn`.
#[derive(Default)]
pub struct TraceWriter;

#[async_trait]
impl Subscribe for TraceWriter {
    fn name(&self) -> &'static str {
        "trace-writer"
    }

    async fn on_event(&self, event: &Event) {
        let slot = event.slot.as_deref().unwrap_or("-");
        match event.kind {
            EventKind::LeaderElected => info!(seq = event.seq, "leader elected"),
            EventKind::FollowerStarted => info!(seq = event.seq, "running as follower"),
            EventKind::WorkerSpawned => {
                debug!(seq = event.seq, slot, pid = event.pid, "worker spawned");
            }
            EventKind::WorkerStillRunning => {
                debug!(seq = event.seq, slot, pid = event.pid, "worker still running; slot parked");
            }
            EventKind::WorkerExited => {
                debug!(seq = event.seq, slot, pid = event.pid, code = event.value, "worker exited");
            }
            EventKind::SpawnFailed => {
                warn!(seq = event.seq, slot, reason = event.reason.as_deref(), "worker spawn failed");
            }
            EventKind::CounterOverwritten => {
                debug!(seq = event.seq, value = event.value, "counter overwritten");
            }
            EventKind::SnapshotFailed => {
                warn!(seq = event.seq, reason = event.reason.as_deref(), "snapshot append failed");
            }
            EventKind::ShutdownRequested => info!(seq = event.seq, "shutdown requested"),
            EventKind::AllStoppedWithin => info!(seq = event.seq, "all loops stopped within grace"),
            EventKind::GraceExceeded => warn!(seq = event.seq, "shutdown grace exceeded"),
        }
    }
}
