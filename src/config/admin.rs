//! Signing requirements for the administrative endpoints.

use std::env;

/// Configuration for HMAC signature validation on admin requests
///
/// Admin requests are always signed. Without a secret the administrative
/// endpoints refuse every request.
#[derive(Clone, Debug)]
pub struct AdminAuthConfig {
    pub secret: Option<String>,
    pub timestamp_tolerance_seconds: u64,
}

impl Default for AdminAuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            timestamp_tolerance_seconds: 300,
        }
    }
}

impl AdminAuthConfig {
    /// Require signatures made with the given secret
    pub fn signed(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Whether admin requests can be accepted at all
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let secret = env::var("ADMIN_HMAC_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let timestamp_tolerance_seconds = env::var("ADMIN_HMAC_TIMESTAMP_TOLERANCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        Self {
            secret,
            timestamp_tolerance_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_disabled_without_secret() {
        assert!(!AdminAuthConfig::default().is_enabled());
        assert!(AdminAuthConfig::signed("secret").is_enabled());
    }
}
