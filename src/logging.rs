use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn directive(quiet: bool) -> &'static str {
    if quiet { "flagfig=error" } else { "flagfig=info" }
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// When `quiet` is true, only error-level events are emitted. `RUST_LOG`
/// replaces the default filter when set. `json` selects one JSON object per
/// event instead of the human-readable format.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(quiet: bool, json: bool) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(quiet)));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .with_span_list(false)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(filter)
        .try_init()
}
