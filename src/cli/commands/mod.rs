//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod play;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::error::WerewolfError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// With no subcommand, the root-level play options are used; with `play`,
/// its own options take precedence over the root-level ones.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), WerewolfError> {
    match cli.command {
        None => play::run(&cli.play, cancel).await,
        Some(Commands::Play(args)) => play::run(&args.merged_over(&cli.play), cancel).await,
        Some(Commands::Completions(args)) => {
            completions::run(&args);
            Ok(())
        }
        Some(Commands::Version(args)) => {
            version::run(&args);
            Ok(())
        }
    }
}
