//! Configuration for the upstream HTTP client
//!
//! Provides environment-based configuration with sensible defaults for
//! production use. Unparseable values fall back to the defaults.

use crate::services::upstream_client::{DEFAULT_USER_AGENT, UpstreamClientConfig};
use super::env_flag;
use std::env;

impl UpstreamClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let request_timeout_seconds = env::var("UPSTREAM_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u64| *v > 0)
            .unwrap_or(10);

        let connect_timeout_seconds = env::var("UPSTREAM_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u64| *v > 0)
            .unwrap_or(3);

        let user_agent = env::var("UPSTREAM_USER_AGENT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let enable_detailed_logging = env_flag("UPSTREAM_DETAILED_LOGGING", true);

        Self {
            request_timeout_seconds,
            connect_timeout_seconds,
            user_agent,
            enable_detailed_logging,
        }
    }
}
