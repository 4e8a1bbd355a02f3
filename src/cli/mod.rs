//! Command-line interface
//!
//! Argument parsing and command handlers for the `werewolf` binary.

pub mod args;
pub mod commands;
