//! Exclusive owner for a shared phase machine
//!
//! The [`PhaseActor`] task owns a [`PhaseMachine`] and applies requests from
//! an inbound queue one at a time, in arrival order. Any number of
//! [`PhaseHandle`] clones can submit commands concurrently.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::PhaseError;
use crate::observability::metrics;

use super::machine::PhaseMachine;
use super::state::{Command, Phase, PhaseTransition};

/// Inbound queue capacity.
const QUEUE_CAPACITY: usize = 64;

enum Request {
    Transition {
        command: Command,
        reply: oneshot::Sender<Result<PhaseTransition, PhaseError>>,
    },
    Current {
        reply: oneshot::Sender<Phase>,
    },
}

/// Task that owns a phase machine.
pub struct PhaseActor {
    machine: PhaseMachine,
    inbox: mpsc::Receiver<Request>,
    cancel: CancellationToken,
}

impl PhaseActor {
    /// Spawns the actor on the current tokio runtime and returns a handle.
    ///
    /// The task ends when every handle is dropped or
    /// [`PhaseHandle::shutdown`] is called.
    #[must_use]
    pub fn spawn(machine: PhaseMachine) -> PhaseHandle {
        let (tx, inbox) = mpsc::channel(QUEUE_CAPACITY);
        let cancel = CancellationToken::new();
        let actor = Self {
            machine,
            inbox,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(actor.run());

        PhaseHandle {
            tx,
            cancel,
            task: std::sync::Arc::new(std::sync::Mutex::new(Some(task))),
        }
    }

    async fn run(mut self) -> PhaseMachine {
        metrics::record_current_phase(self.machine.current());
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!("phase actor cancelled");
                    break;
                }
                request = self.inbox.recv() => {
                    let Some(request) = request else {
                        debug!("all phase handles dropped");
                        break;
                    };
                    self.handle(request);
                }
            }
        }
        self.machine
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Transition { command, reply } => {
                let result = self.machine.transition(command);
                match &result {
                    Ok(t) => {
                        metrics::record_transition(t.from, t.to);
                        metrics::record_current_phase(t.to);
                    }
                    Err(_) => metrics::record_rejected(command),
                }
                // Caller may have given up waiting; nothing to do then.
                let _ = reply.send(result);
            }
            Request::Current { reply } => {
                let _ = reply.send(self.machine.current());
            }
        }
    }
}

impl std::fmt::Debug for PhaseActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseActor")
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

/// Cloneable handle for submitting commands to a [`PhaseActor`].
#[derive(Clone)]
pub struct PhaseHandle {
    tx: mpsc::Sender<Request>,
    cancel: CancellationToken,
    task: std::sync::Arc<std::sync::Mutex<Option<JoinHandle<PhaseMachine>>>>,
}

impl PhaseHandle {
    /// Applies `command` and returns the new current phase.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidTransition`] if the machine rejects the
    /// command, or [`PhaseError::ActorStopped`] if the actor is gone.
    pub async fn apply(&self, command: Command) -> Result<Phase, PhaseError> {
        self.transition(command).await.map(|t| t.to)
    }

    /// Applies `command` and returns the transition record.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidTransition`] if the machine rejects the
    /// command, or [`PhaseError::ActorStopped`] if the actor is gone.
    pub async fn transition(&self, command: Command) -> Result<PhaseTransition, PhaseError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Transition { command, reply })
            .await
            .map_err(|_| PhaseError::ActorStopped)?;
        rx.await.map_err(|_| PhaseError::ActorStopped)?
    }

    /// Returns the current phase.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::ActorStopped`] if the actor is gone.
    pub async fn current(&self) -> Result<Phase, PhaseError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Current { reply })
            .await
            .map_err(|_| PhaseError::ActorStopped)?;
        rx.await.map_err(|_| PhaseError::ActorStopped)
    }

    /// Stops the actor and returns the machine it owned.
    ///
    /// Requests already queued but not yet handled are dropped. Returns
    /// `None` if another handle already collected the machine.
    pub async fn shutdown(&self) -> Option<PhaseMachine> {
        self.cancel.cancel();
        let task = self.task.lock().ok().and_then(|mut guard| guard.take())?;
        task.await.ok()
    }
}

impl std::fmt::Debug for PhaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseHandle")
            .field("closed", &self.tx.is_closed())
            .finish_non_exhaustive()
    }
}
