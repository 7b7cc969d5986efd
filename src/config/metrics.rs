//! Metrics configuration.

use super::env_flag;

/// Configuration for application metrics collection
#[derive(Clone)]
pub struct MetricsConfig {
    /// Serve `/api/metrics`; collection itself always runs
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("METRICS_ENABLED", true),
        }
    }
}
