//! Play command handler
//!
//! Wires stdin/stdout, the phase actor, events and metrics into a
//! [`Console`] session.

use std::sync::Arc;

use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use crate::cli::args::PlayArgs;
use crate::console::{Console, ConsoleOptions};
use crate::error::WerewolfError;
use crate::observability::events::EventEmitter;
use crate::phase::{PhaseActor, PhaseMachine};

/// Run the interactive phase loop on stdin/stdout.
///
/// # Errors
///
/// Returns an I/O error if the events file cannot be created or the
/// console fails to read or write, and a metrics error if the Prometheus
/// listener cannot be started.
pub async fn run(args: &PlayArgs, cancel: CancellationToken) -> Result<(), WerewolfError> {
    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let events = if let Some(ref path) = args.events_file {
        tracing::info!(events_file = %path.display(), "writing events");
        EventEmitter::from_file(path)?
    } else {
        EventEmitter::noop()
    };

    let options = ConsoleOptions {
        input: args.input.unwrap_or_default(),
        exit_on_finish: args.exit_on_finish,
    };

    let handle = PhaseActor::spawn(PhaseMachine::new());
    let mut console = Console::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        handle.clone(),
        options,
    )
    .with_events(Arc::new(events))
    .with_cancel(cancel);

    let result = console.run().await;
    handle.shutdown().await;

    let summary = result?;
    tracing::debug!(?summary, "play finished");
    Ok(())
}
