//! Configuration structures and loading utilities.
//!
//! Every structure loads itself from environment variables through a
//! `from_env` constructor. Only the weather API key is mandatory; all other
//! values fall back to defaults when absent or unparseable.

pub mod forecast;
pub mod logging;
pub mod metrics;
pub mod security;
pub mod server;
pub mod upstream;

pub use forecast::*;
pub use logging::*;
pub use metrics::*;
pub use security::*;
pub use server::*;

/// Read a boolean flag (`true`/`false`, case-insensitive)
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

/// Serializes tests that mutate process environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
