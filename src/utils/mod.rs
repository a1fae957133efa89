pub mod build_info;

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber, writing to stderr so shell output stays clean.
///
/// An unparsable `default_directive` falls back to the built-in default.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new(intake_config::DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
