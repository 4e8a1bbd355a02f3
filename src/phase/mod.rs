//! Phase machine
//!
//! Tracks which of three abstract phases a game is in and enforces the
//! transitions between them. Game rules (roles, votes, win conditions) live
//! elsewhere; this module only knows Night, Day and Finished.
//!
//! # Architecture
//!
//! - [`PhaseMachine`] — Owns the current phase; `apply` is the only mutator
//! - [`dispatch`] — Token lookup table from raw input to [`Instruction`]
//! - [`GameMessage`] — JSON envelope for line-oriented drivers
//! - [`PhaseActor`] — Task that serializes commands from many handles

pub mod actor;
pub mod dispatch;
pub mod machine;
pub mod message;
pub mod state;

pub use actor::{PhaseActor, PhaseHandle};
pub use dispatch::{Instruction, parse_instruction};
pub use machine::{PhaseMachine, next_phase};
pub use message::{GameMessage, MessageCommand};
pub use state::{Command, Phase, PhaseTransition};
