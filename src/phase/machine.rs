//! Phase machine
//!
//! The transition table and the value that owns the current phase.
//! `apply` is synchronous and never blocks; callers embedding the machine
//! in a multi-actor setting serialize access themselves (see
//! [`PhaseActor`](super::actor::PhaseActor)).

use tracing::{info, warn};

use crate::error::PhaseError;

use super::state::{Command, Phase, PhaseTransition};

/// The transition table.
///
/// Returns `None` when `command` has no transition from `current`, which is
/// the case for every command once the game is finished.
#[must_use]
pub const fn next_phase(current: Phase, command: Command) -> Option<Phase> {
    match (current, command) {
        (Phase::Night, Command::Next) => Some(Phase::Day),
        (Phase::Day, Command::Next) => Some(Phase::Night),
        (Phase::Night | Phase::Day, Command::Finish) => Some(Phase::Finished),
        (Phase::Finished, _) => None,
    }
}

/// Owns the current phase and enforces the transition table.
///
/// Starts at [`Phase::Night`]. The stored phase changes only through
/// [`apply`](Self::apply) or [`transition`](Self::transition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseMachine {
    current: Phase,
    transitions: u64,
}

impl PhaseMachine {
    /// Creates a machine in the initial phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Phase::Night,
            transitions: 0,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn current(&self) -> Phase {
        self.current
    }

    /// Returns `true` once the terminal phase has been reached.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.current.is_terminal()
    }

    /// Number of successful transitions so far.
    #[must_use]
    pub const fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Applies `command` and returns the new current phase.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidTransition`] if `command` has no
    /// transition from the current phase. The stored phase is unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Phase, PhaseError> {
        self.transition(command).map(|t| t.to)
    }

    /// Applies `command` and returns the full transition record.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidTransition`] if `command` has no
    /// transition from the current phase. The stored phase is unchanged.
    pub fn transition(&mut self, command: Command) -> Result<PhaseTransition, PhaseError> {
        let from = self.current;
        let Some(to) = next_phase(from, command) else {
            warn!(phase = %from, %command, "command rejected");
            return Err(PhaseError::InvalidTransition { from, command });
        };

        self.current = to;
        self.transitions = self.transitions.saturating_add(1);
        info!(%from, %to, %command, "phase transition");

        Ok(PhaseTransition { from, to, command })
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}
