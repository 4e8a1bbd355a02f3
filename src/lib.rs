//! `werewolf` — Night/Day phase machine for social-deception party games
//!
//! The core is [`phase::PhaseMachine`]: it holds one of `Night`, `Day` or
//! `Finished` and changes only through `apply`. Everything else in this crate
//! is boundary: token dispatch, the interactive console, and the CLI.

pub mod cli;
pub mod console;
pub mod error;
pub mod observability;
pub mod phase;
