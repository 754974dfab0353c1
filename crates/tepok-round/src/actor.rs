//! Engine actor: a Tokio task that owns a [`RoundEngine`] and its clock.
//!
//! All mutation happens on that one task. The outside world sends
//! commands through an mpsc channel and watches snapshots through a
//! `watch` channel, so renderers never touch the engine directly.

use rand::Rng;
use tepok_clock::Pacer;
use tepok_protocol::{Player, RoundSnapshot, Screen, TapOutcome};
use tokio::sync::{mpsc, oneshot, watch};

use crate::{Announcer, RoundEngine, RoundError};

/// Default command channel size for engine actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Commands sent to the engine actor.
///
/// Variants with a `reply` carry the engine's answer back to the caller.
pub(crate) enum EngineCommand {
    Tap {
        player: Player,
        reply: oneshot::Sender<Option<TapOutcome>>,
    },
    Pause {
        reply: oneshot::Sender<bool>,
    },
    Resume {
        reply: oneshot::Sender<bool>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Navigate {
        screen: Screen,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<RoundSnapshot>,
    },
    Shutdown,
}

/// Handle to a running engine actor.
///
/// Cheap to clone. Every method fails with [`RoundError::Unavailable`]
/// once the actor has stopped.
#[derive(Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineCommand>,
    snapshots: watch::Receiver<RoundSnapshot>,
}

impl EngineHandle {
    /// Player tap. `Ok(None)` means the tap was ignored.
    pub async fn tap(&self, player: Player) -> Result<Option<TapOutcome>, RoundError> {
        self.request(|reply| EngineCommand::Tap { player, reply }).await
    }

    /// `Ok(false)` means pausing was not allowed right now.
    pub async fn pause(&self) -> Result<bool, RoundError> {
        self.request(|reply| EngineCommand::Pause { reply }).await
    }

    /// `Ok(false)` means the round was not paused.
    pub async fn resume(&self) -> Result<bool, RoundError> {
        self.request(|reply| EngineCommand::Resume { reply }).await
    }

    /// Starts a fresh round.
    pub async fn reset(&self) -> Result<(), RoundError> {
        self.request(|reply| EngineCommand::Reset { reply }).await
    }

    /// Screen change; see [`RoundEngine::navigate`].
    pub async fn navigate(&self, screen: Screen) -> Result<bool, RoundError> {
        self.request(|reply| EngineCommand::Navigate { screen, reply })
            .await
    }

    /// Current snapshot, taken on the actor after due timers have run.
    pub async fn snapshot(&self) -> Result<RoundSnapshot, RoundError> {
        self.request(|reply| EngineCommand::Snapshot { reply }).await
    }

    /// A receiver that is marked changed on every state change.
    pub fn subscribe(&self) -> watch::Receiver<RoundSnapshot> {
        self.snapshots.clone()
    }

    /// Tells the actor to stop. Pending timers are dropped with it.
    pub async fn shutdown(&self) -> Result<(), RoundError> {
        self.sender
            .send(EngineCommand::Shutdown)
            .await
            .map_err(|_| RoundError::Unavailable)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> EngineCommand,
    ) -> Result<T, RoundError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RoundError::Unavailable)?;
        reply_rx.await.map_err(|_| RoundError::Unavailable)
    }
}

/// The actor state. Runs inside a Tokio task.
struct EngineActor<A, R> {
    engine: RoundEngine<A, R>,
    pacer: Pacer,
    receiver: mpsc::Receiver<EngineCommand>,
    snapshots: watch::Sender<RoundSnapshot>,
}

impl<A: Announcer, R: Rng + Send + 'static> EngineActor<A, R> {
    /// Runs until shutdown or until every handle is dropped.
    async fn run(mut self) {
        tracing::info!("engine actor started");

        loop {
            let deadline = self.engine.next_deadline();
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    // Timers that came due before this command go first.
                    self.engine.advance_to(self.pacer.elapsed());
                    if !self.handle(cmd) {
                        break;
                    }
                }
                () = self.pacer.sleep_until(deadline) => {
                    self.engine.advance_to(self.pacer.elapsed());
                }
            }
            self.publish();
        }

        tracing::info!("engine actor stopped");
    }

    /// Applies one command. Returns `false` on shutdown.
    fn handle(&mut self, cmd: EngineCommand) -> bool {
        match cmd {
            EngineCommand::Tap { player, reply } => {
                let _ = reply.send(self.engine.tap(player));
            }
            EngineCommand::Pause { reply } => {
                let _ = reply.send(self.engine.pause());
            }
            EngineCommand::Resume { reply } => {
                let _ = reply.send(self.engine.resume());
            }
            EngineCommand::Reset { reply } => {
                self.engine.reset();
                let _ = reply.send(());
            }
            EngineCommand::Navigate { screen, reply } => {
                let _ = reply.send(self.engine.navigate(screen));
            }
            EngineCommand::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
            EngineCommand::Shutdown => {
                tracing::info!("engine shutting down");
                return false;
            }
        }
        true
    }

    /// Pushes a new snapshot to watchers if the engine changed.
    fn publish(&self) {
        let revision = self.engine.revision();
        self.snapshots.send_if_modified(|current| {
            if current.revision == revision {
                return false;
            }
            *current = self.engine.snapshot();
            true
        });
    }
}

/// Moves `engine` onto its own Tokio task and returns a handle to it.
///
/// The engine keeps its virtual clock: wall-clock time from here on is
/// added to whatever time the engine had already reached.
pub fn spawn_engine<A, R>(engine: RoundEngine<A, R>) -> EngineHandle
where
    A: Announcer,
    R: Rng + Send + 'static,
{
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);
    let (snap_tx, snap_rx) = watch::channel(engine.snapshot());

    let actor = EngineActor {
        pacer: Pacer::starting_at(engine.now()),
        engine,
        receiver: rx,
        snapshots: snap_tx,
    };

    tokio::spawn(actor.run());

    EngineHandle {
        sender: tx,
        snapshots: snap_rx,
    }
}
