//! Brute-force detection thresholds.

use std::{collections::BTreeSet, env};

/// Thresholds and overrides read by the trust evaluator
///
/// Thresholds are compared literally against failure counts, so zero or a
/// negative value leaves every matching pair untrusted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BruteForceConfig {
    /// Failures allowed for one (remote, login) pair before it is banned
    pub max_by_ip_user: i64,
    /// Failures allowed for one remote across all logins before it is banned
    pub max_by_ip: i64,
    /// Remotes that are always trusted
    pub whitelist_remotes: BTreeSet<String>,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            max_by_ip_user: 10,
            max_by_ip: 50,
            whitelist_remotes: BTreeSet::new(),
        }
    }
}

impl BruteForceConfig {
    /// Build a config with the given thresholds and no whitelisted remotes
    pub fn with_limits(max_by_ip_user: i64, max_by_ip: i64) -> Self {
        Self {
            max_by_ip_user,
            max_by_ip,
            whitelist_remotes: BTreeSet::new(),
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let max_by_ip_user = env::var("AUTH_BRUTE_FORCE_MAX_BY_IP_USER")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(10);

        let max_by_ip = env::var("AUTH_BRUTE_FORCE_MAX_BY_IP")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(50);

        let whitelist_remotes = env::var("AUTH_BRUTE_FORCE_WHITELIST_REMOTES")
            .map(|v| parse_remote_list(&v))
            .unwrap_or_default();

        Self {
            max_by_ip_user,
            max_by_ip,
            whitelist_remotes,
        }
    }

    /// Whether the remote is listed as always trusted
    pub fn is_whitelisted_remote(&self, remote: &str) -> bool {
        self.whitelist_remotes.contains(remote)
    }
}

/// Parse a comma separated list of remotes, ignoring blanks
pub fn parse_remote_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_list() {
        let remotes = parse_remote_list(" 127.0.0.1, ,10.0.0.2,127.0.0.1 ");
        assert_eq!(remotes.len(), 2);
        assert!(remotes.contains("127.0.0.1"));
        assert!(remotes.contains("10.0.0.2"));
    }

    #[test]
    fn test_with_limits() {
        let config = BruteForceConfig::with_limits(3, 4);
        assert_eq!(config.max_by_ip_user, 3);
        assert_eq!(config.max_by_ip, 4);
        assert!(!config.is_whitelisted_remote("127.0.0.1"));
    }
}
