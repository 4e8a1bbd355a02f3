//! Instruction dispatch
//!
//! Maps raw player tokens to instructions through a fixed lookup table.
//! Tokens outside the table are rejected here and never reach the
//! [`PhaseMachine`](super::PhaseMachine).

use std::str::FromStr;

use crate::error::DispatchError;

use super::state::Command;

/// A recognized instruction from a player or operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Submit a command to the phase machine.
    Apply(Command),
    /// Leave the interactive loop. Not a state transition.
    Quit,
}

/// Accepted tokens, long form first.
const TOKENS: [(&str, Instruction); 6] = [
    ("next", Instruction::Apply(Command::Next)),
    ("n", Instruction::Apply(Command::Next)),
    ("finish", Instruction::Apply(Command::Finish)),
    ("f", Instruction::Apply(Command::Finish)),
    ("quit", Instruction::Quit),
    ("q", Instruction::Quit),
];

/// Maximum edit distance for a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Parses a raw token into an [`Instruction`].
///
/// Surrounding whitespace is ignored and matching is case-insensitive.
///
/// # Errors
///
/// Returns [`DispatchError::UnrecognizedInstruction`] if the token is not in
/// the table.
pub fn parse_instruction(raw: &str) -> Result<Instruction, DispatchError> {
    let token = raw.trim().to_ascii_lowercase();

    TOKENS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, instruction)| *instruction)
        .ok_or_else(|| DispatchError::UnrecognizedInstruction {
            suggestion: suggest_token(&token),
            token,
        })
}

/// Suggests the closest known long-form token for a typo.
///
/// Single-character input is too short to guess from and yields `None`.
#[must_use]
pub fn suggest_token(input: &str) -> Option<&'static str> {
    if input.chars().count() < 2 {
        return None;
    }

    TOKENS
        .iter()
        .map(|(t, _)| *t)
        .filter(|t| t.len() > 1)
        .map(|t| (t, strsim::damerau_levenshtein(input, t)))
        .filter(|(_, dist)| *dist <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, dist)| *dist)
        .map(|(t, _)| t)
}

/// Returns all accepted tokens in table order.
#[must_use]
pub fn known_tokens() -> Vec<&'static str> {
    TOKENS.iter().map(|(t, _)| *t).collect()
}

impl FromStr for Instruction {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_instruction(s)
    }
}
