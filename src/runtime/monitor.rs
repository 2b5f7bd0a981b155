//! # Monitor: wires one instance of the coordination runtime together.
//!
//! Every instance of the program builds a [`Monitor`] and calls
//! [`Monitor::run`]. The monitor:
//!
//! 1. opens (create-or-attach) the shared counter segment;
//! 2. journals a `Program start` record;
//! 3. makes the one-shot leader election attempt;
//! 4. starts the counter drivers — in **every** instance;
//! 5. if leader: additionally starts the snapshot writer and the leader loop;
//! 6. waits for a shutdown signal, cancels every loop, and gives them a
//!    grace period to stop.
//!
//! ## Wiring
//! ```text
//! Monitor::run()
//!   ├─ SharedCounter::open(segment)        (all instances share one cell)
//!   ├─ LeaderElector::try_become_leader()  (one attempt, guard held to exit)
//!   ├─ JoinSet:
//!   │    ├─ run_ticker        (every instance,   300 ms add(1))
//!   │    ├─ run_overwrite     (every instance,   stdin → store)
//!   │    ├─ run_snapshot_writer (leader only,    1 s Counter= records)
//!   │    └─ run_leader_loop     (leader only,    3 s slot inspection)
//!   ├─ Bus ──► subscriber listener ──► SubscriberSet::emit
//!   └─ shutdown signal → token.cancel() → wait_all_with_grace
//! ```
//!
//! Workers spawned by the leader loop are separate processes; they attach the
//! same segment and journal on their own (see [`crate::workers`]) and are not
//! part of this instance's join set.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, BufReader};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::Config;
use crate::counter::SharedCounter;
use crate::drivers::{run_overwrite, run_ticker};
use crate::election::{LeaderElector, Leadership};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::journal::AppendLog;
use crate::leader::{run_leader_loop, run_snapshot_writer, SlotTable};
use crate::spawn::{Launch, ProcessLauncher};
use crate::subscribers::{Subscribe, SubscriberSet};

use super::shutdown;

/// One instance of the coordination runtime.
pub struct Monitor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    launcher: Arc<dyn Launch>,
}

impl Monitor {
    /// Creates a monitor with the given configuration, no subscribers, and
    /// the production process launcher.
    pub fn new(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        Self {
            cfg,
            bus,
            subs: Arc::new(SubscriberSet::new(Vec::new())),
            launcher: Arc::new(ProcessLauncher),
        }
    }

    /// Replaces the subscriber set.
    pub fn with_subscribers(mut self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subs = Arc::new(SubscriberSet::new(subs));
        self
    }

    /// Replaces the worker launcher (tests, embedders).
    pub fn with_launcher(mut self, launcher: Arc<dyn Launch>) -> Self {
        self.launcher = launcher;
        self
    }

    /// The event bus; subscribe before calling `run` to observe lifecycle
    /// events directly.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs until a termination signal arrives, reading overwrite input from
    /// stdin. Returns after all loops stop (or the grace period expires).
    pub async fn run(self) -> Result<(), RuntimeError> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_inner(stdin, CancellationToken::new(), true).await
    }

    /// Runs until `token` is cancelled, reading overwrite input from `input`.
    ///
    /// No signal handlers are installed; the caller owns the shutdown
    /// trigger. Used by tests and embedders.
    pub async fn run_until_cancelled<R>(
        self,
        input: R,
        token: CancellationToken,
    ) -> Result<(), RuntimeError>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        self.run_inner(input, token, false).await
    }

    async fn run_inner<R>(
        self,
        input: R,
        token: CancellationToken,
        listen_for_signals: bool,
    ) -> Result<(), RuntimeError>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let counter = SharedCounter::open(&self.cfg.segment_name)?;
        let journal = Arc::new(AppendLog::new(&self.cfg.journal_path));
        if let Err(error) = journal.append("Program start") {
            warn!(%error, "could not journal program start");
        }

        self.subscriber_listener();

        // One attempt, held (or not) for the rest of this process's life.
        let leadership = LeaderElector::new(&self.cfg.lock_path).try_become_leader();
        self.bus.publish(Event::now(match leadership {
            Leadership::Leader(_) => EventKind::LeaderElected,
            Leadership::Follower => EventKind::FollowerStarted,
        }));

        let mut set = JoinSet::new();
        set.spawn(run_ticker(
            counter.clone(),
            self.cfg.tick_period,
            token.child_token(),
        ));
        set.spawn(run_overwrite(
            counter.clone(),
            input,
            self.bus.clone(),
            token.child_token(),
        ));

        if leadership.is_leader() {
            set.spawn({
                let writer = run_snapshot_writer(
                    counter.clone(),
                    Arc::clone(&journal),
                    self.bus.clone(),
                    self.cfg.snapshot_period,
                    token.child_token(),
                );
                async move {
                    if let Err(error) = writer.await {
                        warn!(%error, "snapshot writer terminated");
                    }
                }
            });

            let table = SlotTable::new(self.cfg.slots.clone(), Arc::clone(&self.launcher));
            set.spawn(run_leader_loop(
                table,
                Arc::clone(&journal),
                self.bus.clone(),
                self.cfg.cycle_period,
                token.child_token(),
            ));
        }

        if listen_for_signals {
            tokio::select! {
                res = shutdown::wait_for_shutdown_signal() => {
                    let mut ev = Event::now(EventKind::ShutdownRequested);
                    match res {
                        Ok(signal_name) => ev = ev.with_reason(signal_name),
                        Err(error) => {
                            warn!(%error, "signal listener failed; waiting on token");
                            token.cancelled().await;
                        }
                    }
                    self.bus.publish(ev);
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        } else {
            token.cancelled().await;
        }

        // The leader lock must outlive every loop we started.
        let result = self.wait_all_with_grace(&mut set).await;
        drop(leadership);
        result
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    fn subscriber_listener(&self) {
        if self.subs.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                subs.emit(&ev).await;
            }
        });
    }

    /// Waits for all loops to finish within the configured grace period.
    async fn wait_all_with_grace(&self, set: &mut JoinSet<()>) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };

        match tokio::time::timeout(grace, done).await {
            Ok(_) => {
                self.bus.publish(Event::now(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                Err(RuntimeError::GraceExceeded { grace })
            }
        }
    }
}
