//! Metrics collection for `werewolf`.
//!
//! Prometheus-compatible counters and gauges for phase activity. Labels
//! come only from the closed [`Phase`] and [`Command`] sets, so label
//! cardinality is fixed.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::WerewolfError;
use crate::phase::{Command, Phase};

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// Must be called from within a tokio runtime when `port` is `Some`.
///
/// # Errors
///
/// Returns `WerewolfError::Metrics` if the recorder or HTTP listener
/// cannot be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), WerewolfError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| WerewolfError::Metrics(e.to_string()))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "werewolf_transitions_total",
        "Total number of successful phase transitions"
    );
    describe_counter!(
        "werewolf_commands_rejected_total",
        "Commands rejected because no transition exists"
    );
    describe_counter!(
        "werewolf_instructions_unrecognized_total",
        "Input lines that matched no instruction"
    );
    describe_gauge!(
        "werewolf_current_phase",
        "Currently active phase (1 = active)"
    );
}

/// Records a successful phase transition.
pub fn record_transition(from: Phase, to: Phase) {
    counter!(
        "werewolf_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}

/// Records a command the machine rejected.
pub fn record_rejected(command: Command) {
    counter!("werewolf_commands_rejected_total", "command" => command.as_str()).increment(1);
}

/// Records an input line that matched no instruction.
pub fn record_unrecognized() {
    counter!("werewolf_instructions_unrecognized_total").increment(1);
}

/// Sets the currently active phase gauge, zeroing the others.
pub fn record_current_phase(current: Phase) {
    for phase in Phase::ALL {
        let value = if phase == current { 1.0 } else { 0.0 };
        gauge!("werewolf_current_phase", "phase" => phase.as_str()).set(value);
    }
}
