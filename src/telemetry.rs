//! Tracing subscriber setup.

use crate::config::{DEFAULT_LOG_FILTER, LogFormat, LoggingConfig};
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// An unparseable filter falls back to `info`. Calling this twice is a no-op,
/// so tests may initialize logging freely.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?}: {e}; using {DEFAULT_LOG_FILTER}", config.filter);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let builder = fmt().with_env_filter(filter).with_target(true);

    let _ = match config.format {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Text => builder.try_init(),
    };
}
