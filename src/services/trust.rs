//! Trust evaluation over the attempt ledger.
//!
//! A (remote, login) pair is trusted unless the tail of its history shows a
//! run of failures at or over the configured thresholds, or an active ban.
//! Only the tail since the last non-failed record is read, for the pair and
//! for the remote as a whole.

use crate::{
    config::BruteForceConfig,
    models::{AttemptRecord, AttemptResult},
    services::ledger::{AttemptLedger, LedgerError},
};
use std::ops::ControlFlow;

/// Why a pair is currently untrusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Trusted,
    /// A `banned` record is the most recent status record for the pair
    PairBanned,
    /// Too many recent failures for this exact pair
    TooManyForLogin { failures: usize },
    /// Too many recent failures from this remote across all logins
    TooManyForRemote { failures: usize },
}

impl Verdict {
    pub fn is_trusted(&self) -> bool {
        matches!(self, Verdict::Trusted)
    }
}

/// Failure counts backing a trust decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureCounts {
    pub by_ip_user: usize,
    pub by_ip: usize,
    pub pair_banned: bool,
    pub pair_whitelisted: bool,
}

/// Pure trust computation: a function of ledger contents, config and key
pub struct TrustEvaluator<'a> {
    ledger: &'a dyn AttemptLedger,
    config: &'a BruteForceConfig,
}

impl<'a> TrustEvaluator<'a> {
    pub fn new(ledger: &'a dyn AttemptLedger, config: &'a BruteForceConfig) -> Self {
        Self { ledger, config }
    }

    /// Whether `remote` may currently attempt to authenticate as `login`
    pub fn is_trusted(&self, remote: &str, login: &str) -> Result<bool, LedgerError> {
        Ok(self.verdict(remote, login)?.is_trusted())
    }

    /// Evaluate the pair and report the reason when it is untrusted
    pub fn verdict(&self, remote: &str, login: &str) -> Result<Verdict, LedgerError> {
        if self.config.is_whitelisted_remote(remote) {
            return Ok(Verdict::Trusted);
        }

        let counts = self.counts(remote, login)?;
        if counts.pair_whitelisted {
            return Ok(Verdict::Trusted);
        }
        if counts.pair_banned {
            return Ok(Verdict::PairBanned);
        }
        if counts.by_ip_user as i64 >= self.config.max_by_ip_user {
            return Ok(Verdict::TooManyForLogin {
                failures: counts.by_ip_user,
            });
        }
        if counts.by_ip as i64 >= self.config.max_by_ip {
            return Ok(Verdict::TooManyForRemote {
                failures: counts.by_ip,
            });
        }
        Ok(Verdict::Trusted)
    }

    /// Count the current failure runs for the pair and for the remote
    pub fn counts(&self, remote: &str, login: &str) -> Result<FailureCounts, LedgerError> {
        let mut counts = FailureCounts {
            pair_whitelisted: self.ledger.pair_whitelisted(remote, login)?,
            ..FailureCounts::default()
        };

        self.ledger.walk_back(remote, Some(login), &mut |record| {
            pair_step(record, &mut counts)
        })?;

        self.ledger.walk_back(remote, None, &mut |record| {
            remote_step(record, &mut counts.by_ip)
        })?;

        Ok(counts)
    }
}

fn pair_step(record: &AttemptRecord, counts: &mut FailureCounts) -> ControlFlow<()> {
    if record.whitelisted {
        return ControlFlow::Continue(());
    }
    // The newest ban stays in force for its own pair until something supersedes it
    counts.pair_banned = record.result == AttemptResult::Banned;
    failure_step(record, &mut counts.by_ip_user)
}

fn remote_step(record: &AttemptRecord, by_ip: &mut usize) -> ControlFlow<()> {
    if record.whitelisted {
        return ControlFlow::Continue(());
    }
    failure_step(record, by_ip)
}

fn failure_step(record: &AttemptRecord, count: &mut usize) -> ControlFlow<()> {
    if record.result.resets_failures() {
        return ControlFlow::Break(());
    }
    *count += 1;
    ControlFlow::Continue(())
}
