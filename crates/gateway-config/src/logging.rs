//! Logging initialization for gateway hosts.

use tracing_subscriber::EnvFilter;

/// Initialize the logging system for a gateway host.
///
/// Sets up tracing with:
/// - Structured output to stderr
/// - Log level from the `RUST_LOG` env var, falling back to `level`
///
/// Safe to call more than once; later calls are no-ops.
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Gateway started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
