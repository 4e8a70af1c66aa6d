//! Authentication attempt records and ledger queries.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a record when it is appended to the ledger
pub type AttemptId = u64;

/// Outcome stored for an authentication attempt or administrative action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Successful,
    Failed,
    Banned,
    Unbanned,
}

impl AttemptResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptResult::Successful => "successful",
            AttemptResult::Failed => "failed",
            AttemptResult::Banned => "banned",
            AttemptResult::Unbanned => "unbanned",
        }
    }

    /// Whether this result closes a run of failures for the pair or remote
    pub fn resets_failures(&self) -> bool {
        !matches!(self, AttemptResult::Failed)
    }
}

impl fmt::Display for AttemptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the attempt ledger
///
/// Everything except `whitelisted` is fixed once the record is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub struct AttemptRecord {
    pub id: AttemptId,
    pub remote: String,
    pub login: String,
    pub result: AttemptResult,
    pub timestamp: DateTime<Utc>,
    pub whitelisted: bool,
}

impl AttemptRecord {
    /// A record is an active ban when it is a `banned` event that has not been whitelisted
    pub fn banned(&self) -> bool {
        self.result == AttemptResult::Banned && !self.whitelisted
    }
}

/// Values supplied by the caller when appending; the ledger assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttempt {
    pub remote: String,
    pub login: String,
    pub result: AttemptResult,
}

impl NewAttempt {
    pub fn new(remote: impl Into<String>, login: impl Into<String>, result: AttemptResult) -> Self {
        Self {
            remote: remote.into(),
            login: login.into(),
            result,
        }
    }
}

/// Search criteria for listing ledger records
///
/// Every field left as `None` matches all records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptFilter {
    pub remote: Option<String>,
    pub login: Option<String>,
    pub result: Option<AttemptResult>,
    pub whitelisted: Option<bool>,
    /// Keep only the newest `limit` matches
    pub limit: Option<usize>,
}

impl AttemptFilter {
    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    pub fn result(mut self, result: AttemptResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn whitelisted(mut self, whitelisted: bool) -> Self {
        self.whitelisted = Some(whitelisted);
        self
    }

    pub fn matches(&self, record: &AttemptRecord) -> bool {
        self.remote.as_deref().is_none_or(|r| r == record.remote)
            && self.login.as_deref().is_none_or(|l| l == record.login)
            && self.result.is_none_or(|r| r == record.result)
            && self.whitelisted.is_none_or(|w| w == record.whitelisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(result: AttemptResult, whitelisted: bool) -> AttemptRecord {
        AttemptRecord {
            id: 1,
            remote: "10.0.0.1".to_string(),
            login: "admin".to_string(),
            result,
            timestamp: Utc::now(),
            whitelisted,
        }
    }

    #[test]
    fn test_banned_is_derived_from_result_and_whitelist() {
        assert!(record(AttemptResult::Banned, false).banned());
        assert!(!record(AttemptResult::Banned, true).banned());
        assert!(!record(AttemptResult::Failed, false).banned());
    }

    #[test]
    fn test_result_serializes_snake_case() {
        let json = serde_json::to_string(&AttemptResult::Unbanned).unwrap();
        assert_eq!(json, "\"unbanned\"");
        assert_eq!(AttemptResult::Successful.to_string(), "successful");
    }

    #[test]
    fn test_every_non_failure_resets() {
        assert!(!AttemptResult::Failed.resets_failures());
        assert!(AttemptResult::Successful.resets_failures());
        assert!(AttemptResult::Banned.resets_failures());
        assert!(AttemptResult::Unbanned.resets_failures());
    }

    #[test]
    fn test_filter_matches() {
        let r = record(AttemptResult::Failed, false);
        assert!(AttemptFilter::default().matches(&r));
        assert!(AttemptFilter::default().remote("10.0.0.1").login("admin").matches(&r));
        assert!(!AttemptFilter::default().login("demo").matches(&r));
        assert!(!AttemptFilter::default().result(AttemptResult::Banned).matches(&r));
        assert!(!AttemptFilter::default().whitelisted(true).matches(&r));
    }
}
