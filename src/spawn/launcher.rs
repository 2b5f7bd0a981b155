//! Production launcher over `tokio::process`.

use std::io;

use tokio::process::{Child, Command};
use tracing::debug;

use super::{ChildProc, ChildStatus, Launch, WorkerCommand};

/// Spawns worker children as real OS processes.
///
/// Must be used from within a tokio runtime (child reaping is wired into the
/// runtime's signal driver). Children are deliberately *not* killed on drop:
/// a worker orphaned by its leader runs to completion.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

struct SpawnedChild {
    pid: u32,
    child: Child,
}

impl ChildProc for SpawnedChild {
    fn id(&self) -> u32 {
        self.pid
    }

    fn try_wait(&mut self) -> io::Result<ChildStatus> {
        match self.child.try_wait()? {
            Some(status) => Ok(ChildStatus::Exited(status.code().unwrap_or(-1))),
            None => Ok(ChildStatus::Running),
        }
    }
}

impl Launch for ProcessLauncher {
    fn spawn(&self, command: &WorkerCommand) -> io::Result<Box<dyn ChildProc>> {
        let child = Command::new(&command.program).args(&command.args).spawn()?;
        // `id()` is None only once the child has been reaped, which cannot
        // have happened yet for a child we just spawned and still hold.
        let pid = child.id().unwrap_or_default();
        debug!(program = %command.program.display(), pid, "spawned worker child");
        Ok(Box::new(SpawnedChild { pid, child }))
    }
}
