//! Error types for `werewolf`
//!
//! Two kinds of failure exist at the game level: a command that has no
//! transition from the current phase ([`PhaseError::InvalidTransition`]) and
//! raw input that never becomes a command
//! ([`DispatchError::UnrecognizedInstruction`]). Everything else here is the
//! plumbing around them.

use thiserror::Error;

use crate::phase::{Command, Phase};

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `werewolf` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// I/O error (stdin closed abnormally, events file not writable)
    pub const IO_ERROR: i32 = 3;

    /// Phase machine error (invalid transition, actor gone)
    pub const PHASE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `werewolf` operations.
///
/// Aggregates the domain errors and maps each one to an exit code.
#[derive(Debug, Error)]
pub enum WerewolfError {
    /// Phase machine error
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Instruction dispatch error
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Metrics recorder could not be installed
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl WerewolfError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Phase(_) => ExitCode::PHASE_ERROR,
            Self::Dispatch(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) | Self::Metrics(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Phase Machine Errors
// ============================================================================

/// Phase machine errors.
///
/// A rejected command never mutates the machine, so every variant leaves the
/// caller with a usable machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    /// The command has no defined transition from the current phase.
    #[error("invalid transition: cannot apply '{command}' in phase {from}")]
    InvalidTransition {
        /// Phase the machine was in when the command arrived
        from: Phase,
        /// The rejected command
        command: Command,
    },

    /// The task owning the machine has stopped.
    #[error("phase actor stopped")]
    ActorStopped,
}

impl PhaseError {
    /// Returns `true` for [`PhaseError::InvalidTransition`].
    #[must_use]
    pub const fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

// ============================================================================
// Dispatch Errors
// ============================================================================

/// Boundary errors raised while turning raw input into an instruction.
///
/// These never reach the phase machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The token matches no known instruction.
    #[error("unrecognized instruction '{token}'")]
    UnrecognizedInstruction {
        /// The trimmed input as received
        token: String,
        /// Closest known token, if one is near enough
        suggestion: Option<&'static str>,
    },

    /// A JSON message line could not be decoded.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `werewolf` operations.
pub type Result<T> = std::result::Result<T, WerewolfError>;

// ============================================================================
// Tests
// ============================================================================
