//! JSON message envelope
//!
//! Drivers that speak JSON lines submit one [`GameMessage`] per line
//! instead of a bare token, e.g. `{"command":"next"}`.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

use super::dispatch::Instruction;
use super::state::Command;

/// Command tag carried by a [`GameMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCommand {
    /// Advance Night <-> Day
    Next,
    /// End the game
    Finish,
    /// Exit the loop without a transition
    Quit,
}

/// Envelope for messages that trigger transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMessage {
    /// What the sender asks for
    pub command: MessageCommand,
    /// Reserved for future use; ignored by the machine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl GameMessage {
    /// Creates a message with no payload.
    #[must_use]
    pub const fn new(command: MessageCommand) -> Self {
        Self {
            command,
            data: None,
        }
    }

    /// Decodes a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedMessage`] if the line is not a valid
    /// message (bad JSON, missing or unknown `command`).
    pub fn from_json_line(line: &str) -> Result<Self, DispatchError> {
        serde_json::from_str(line.trim()).map_err(|e| DispatchError::MalformedMessage(e.to_string()))
    }

    /// The instruction this message stands for.
    #[must_use]
    pub const fn instruction(&self) -> Instruction {
        match self.command {
            MessageCommand::Next => Instruction::Apply(Command::Next),
            MessageCommand::Finish => Instruction::Apply(Command::Finish),
            MessageCommand::Quit => Instruction::Quit,
        }
    }
}

impl From<Command> for GameMessage {
    fn from(command: Command) -> Self {
        Self::new(match command {
            Command::Next => MessageCommand::Next,
            Command::Finish => MessageCommand::Finish,
        })
    }
}
