//! Static credentials for the bundled credential verifier.

use std::{collections::HashMap, env};

/// Login/password pairs accepted by the bundled verifier
///
/// Empty by default, in which case every login fails.
#[derive(Clone, Default)]
pub struct CredentialsConfig {
    pub users: HashMap<String, String>,
}

impl CredentialsConfig {
    /// Load `AUTH_USERS` (`login:password,login:password`)
    pub fn from_env() -> Self {
        let users = env::var("AUTH_USERS")
            .map(|value| parse_users(&value))
            .unwrap_or_default();
        Self { users }
    }

    pub fn with_user(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(login.into(), password.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn parse_users(value: &str) -> HashMap<String, String> {
    value
        .split(',')
        .filter_map(|entry| entry.split_once(':'))
        .map(|(login, password)| (login.trim().to_string(), password.to_string()))
        .filter(|(login, _)| !login.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users() {
        let users = parse_users("admin:s3cr:et, demo:demo,broken");
        assert_eq!(users.len(), 2);
        assert_eq!(users["admin"], "s3cr:et");
        assert_eq!(users["demo"], "demo");
    }

    #[test]
    fn test_default_has_no_users() {
        assert!(CredentialsConfig::default().is_empty());
        assert!(!CredentialsConfig::default().with_user("demo", "demo").is_empty());
    }
}
