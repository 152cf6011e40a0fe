//! Diagnostic tracing for the report generator.
//!
//! Progress meant for the user goes to stdout; tracing events go to stderr
//! and are filtered by `RUST_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, so a missing image is
/// reported without extra flags.
///
/// # Example
/// ```bash
/// RUST_LOG=beam_core=debug beam-report -e forces.xlsx
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
