//! Operator overrides of the computed trust state.
//!
//! Every action either flips the `whitelisted` flag or appends a new record;
//! history is never removed.

use crate::{
    config::BruteForceConfig,
    models::{AttemptId, AttemptRecord, AttemptResult, NewAttempt},
    services::{
        ledger::{AttemptLedger, LedgerError},
        trust::TrustEvaluator,
    },
};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Administrative actions operating on ledger record ids
pub struct AdminActions<'a> {
    ledger: &'a dyn AttemptLedger,
    config: &'a BruteForceConfig,
}

impl<'a> AdminActions<'a> {
    pub fn new(ledger: &'a dyn AttemptLedger, config: &'a BruteForceConfig) -> Self {
        Self { ledger, config }
    }

    /// Whitelist the given records, making their pairs permanently trusted
    pub fn whitelist_add(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, LedgerError> {
        let updated = self.ledger.set_whitelisted(&dedup(ids), true)?;
        info!(count = updated.len(), "Whitelisted attempt records");
        Ok(updated)
    }

    /// Drop the whitelist flag from the given records
    pub fn whitelist_remove(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, LedgerError> {
        let updated = self.ledger.set_whitelisted(&dedup(ids), false)?;
        info!(count = updated.len(), "Removed attempt records from whitelist");
        Ok(updated)
    }

    /// Lift the bans behind the given records
    ///
    /// Appends one `unbanned` record per pair that is currently banned,
    /// returning the appended records. Pairs that are not banned are skipped.
    pub fn unban(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, LedgerError> {
        let targets = self.ledger.get(&dedup(ids))?;
        let mut seen = BTreeSet::new();
        let mut appended = Vec::new();

        for target in targets.iter().filter(|r| r.banned()) {
            if !seen.insert((target.remote.as_str(), target.login.as_str())) {
                continue;
            }
            if !self.needs_unban(&target.remote, &target.login)? {
                debug!(record_id = target.id, "Pair already unbanned, skipping");
                continue;
            }
            appended.push(self.ledger.append(NewAttempt::new(
                target.remote.as_str(),
                target.login.as_str(),
                AttemptResult::Unbanned,
            ))?);
        }

        info!(count = appended.len(), "Unbanned attempt pairs");
        Ok(appended)
    }

    /// Force a ban on the pairs behind the given records
    ///
    /// Appends one `banned` record per pair that is not already banned,
    /// returning the appended records.
    pub fn ban(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, LedgerError> {
        let targets = self.ledger.get(&dedup(ids))?;
        let mut seen = BTreeSet::new();
        let mut appended = Vec::new();

        for target in &targets {
            if !seen.insert((target.remote.as_str(), target.login.as_str())) {
                continue;
            }
            if self.is_banned(&target.remote, &target.login)? {
                debug!(record_id = target.id, "Pair already banned, skipping");
                continue;
            }
            appended.push(self.ledger.append(NewAttempt::new(
                target.remote.as_str(),
                target.login.as_str(),
                AttemptResult::Banned,
            ))?);
        }

        info!(count = appended.len(), "Manually banned attempt pairs");
        Ok(appended)
    }

    fn needs_unban(&self, remote: &str, login: &str) -> Result<bool, LedgerError> {
        let trusted = TrustEvaluator::new(self.ledger, self.config).is_trusted(remote, login)?;
        Ok(!trusted)
    }

    fn is_banned(&self, remote: &str, login: &str) -> Result<bool, LedgerError> {
        let counts = TrustEvaluator::new(self.ledger, self.config).counts(remote, login)?;
        Ok(counts.pair_banned)
    }
}

fn dedup(ids: &[AttemptId]) -> Vec<AttemptId> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
