//! Metrics configuration.

use std::env;

/// Configuration for the Prometheus metrics endpoint
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Load `METRICS_ENABLED`; anything other than `false` keeps metrics on
    pub fn from_env() -> Self {
        let enabled = env::var("METRICS_ENABLED")
            .map(|v| v.trim().to_lowercase() != "false")
            .unwrap_or(true);

        Self { enabled }
    }
}
