//! Listener and proxy settings.

use std::env;

/// Configuration for how the service is reached
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    pub bind_address: String,
    /// Take the remote from `X-Forwarded-For` and friends instead of the socket
    pub trust_forwarded_headers: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            trust_forwarded_headers: false,
        }
    }
}

impl NetworkConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let trust_forwarded_headers = env::var("TRUST_FORWARDED_HEADERS")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            bind_address,
            trust_forwarded_headers,
        }
    }
}
