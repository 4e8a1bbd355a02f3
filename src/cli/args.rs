//! CLI argument definitions
//!
//! All Clap derive structs for `werewolf` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::console::InputMode;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Night/Day phase machine for social-deception party games.
///
/// Without a subcommand, runs the interactive phase loop.
#[derive(Parser, Debug)]
#[command(name = "werewolf", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Options for `play` when no subcommand is given.
    #[command(flatten)]
    pub play: PlayArgs,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "WEREWOLF_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive phase loop (default).
    Play(PlayArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Play Command
// ============================================================================

/// Arguments for `play`.
#[derive(Args, Debug, Clone, Default)]
pub struct PlayArgs {
    /// Line format read from stdin and written to stdout [default: text].
    #[arg(long)]
    pub input: Option<InputMode>,

    /// Stop once the game reaches the Finished phase.
    #[arg(long)]
    pub exit_on_finish: bool,

    /// Write structured JSONL events to this file.
    #[arg(long, env = "WEREWOLF_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Expose Prometheus metrics on 127.0.0.1:<PORT>.
    #[arg(long)]
    pub metrics_port: Option<u16>,
}

impl PlayArgs {
    /// Fills options not given to `play` from the root-level ones, so
    /// `werewolf --exit-on-finish play` keeps the flag.
    #[must_use]
    pub fn merged_over(&self, root: &Self) -> Self {
        Self {
            input: self.input.or(root.input),
            exit_on_finish: self.exit_on_finish || root.exit_on_finish,
            events_file: self.events_file.clone().or_else(|| root.events_file.clone()),
            metrics_port: self.metrics_port.or(root.metrics_port),
        }
    }
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
