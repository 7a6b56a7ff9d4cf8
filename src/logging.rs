use std::io::IsTerminal;

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr; stdout is reserved for the JSON response.
/// `RUST_LOG` wins over the configured default filter.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
