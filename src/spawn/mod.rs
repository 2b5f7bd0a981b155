//! Process-launcher boundary consumed by the leader loop.
//!
//! The core needs exactly two operations from the external launcher
//! collaborator: start a child process, and check — without blocking —
//! whether a previously started child is still running. [`Launch`] and
//! [`ChildProc`] capture that boundary; [`ProcessLauncher`] is the
//! production implementation over `tokio::process`.
//!
//! Children are never force-reaped: if the leader dies, orphaned workers
//! keep running to completion on their own.

mod launcher;

pub use launcher::ProcessLauncher;

use std::io;
use std::path::PathBuf;

/// How to start one worker child.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl WorkerCommand {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Command re-invoking the current executable with the given arguments.
    ///
    /// The usual way a collaborator binary spawns its own worker copies.
    pub fn current_exe(args: impl IntoIterator<Item = impl Into<String>>) -> io::Result<Self> {
        let program = std::env::current_exe()?;
        Ok(Self {
            program,
            args: args.into_iter().map(Into::into).collect(),
        })
    }
}

/// Non-blocking liveness answer for a spawned child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// The child has not exited yet.
    Running,
    /// The child exited with the given code (-1 if killed by signal).
    Exited(i32),
}

/// A spawned child process, observable without blocking.
pub trait ChildProc: Send {
    /// OS process id of the child.
    fn id(&self) -> u32;

    /// Checks whether the child exited; returns immediately either way.
    fn try_wait(&mut self) -> io::Result<ChildStatus>;
}

/// Spawns worker children. Object-safe so tests can substitute a fake.
pub trait Launch: Send + Sync {
    /// Starts a child for the given command.
    fn spawn(&self, command: &WorkerCommand) -> io::Result<Box<dyn ChildProc>>;
}
