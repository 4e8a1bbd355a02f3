//! Phase and command values
//!
//! Plain `Copy` values with serde names matching the tokens players type.

use serde::{Deserialize, Serialize};

/// One of the three mutually exclusive states of game flow.
///
/// `Finished` is absorbing: no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Werewolves act; villagers sleep. Initial phase.
    #[default]
    Night,
    /// Discussion, accusations, and voting.
    Day,
    /// The game is over.
    Finished,
}

impl Phase {
    /// All phases, in declaration order.
    pub const ALL: [Self; 3] = [Self::Night, Self::Day, Self::Finished];

    /// Returns `true` if no transition leaves this phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Canonical display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Night => "Night",
            Self::Day => "Day",
            Self::Finished => "Finished",
        }
    }

    /// Flavor line shown when the phase is entered.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Night => "Werewolves act; villagers sleep.",
            Self::Day => "Discussion, accusations, and voting.",
            Self::Finished => "No further moves allowed.",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instruction submitted to the phase machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Advance the day/night cycle.
    Next,
    /// End the game.
    Finish,
}

impl Command {
    /// Both commands, in declaration order.
    pub const ALL: [Self; 2] = [Self::Next, Self::Finish];

    /// Canonical token for this command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Finish => "finish",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a successful phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTransition {
    /// Phase before the command
    pub from: Phase,
    /// Phase after the command
    pub to: Phase,
    /// Command that caused the transition
    pub command: Command,
}

impl std::fmt::Display for PhaseTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
