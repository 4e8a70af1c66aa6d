//! Write path for authentication outcomes.

use crate::{
    config::BruteForceConfig,
    models::{AttemptRecord, AttemptResult, NewAttempt},
    services::{
        ledger::{AttemptLedger, LedgerError},
        trust::{TrustEvaluator, Verdict},
    },
};
use serde::Serialize;
use tracing::{debug, warn};

/// Result of recording one authentication event
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// The record appended for this event
    pub record: AttemptRecord,
    /// Whether the pair is still allowed to authenticate afterwards
    pub trusted_after: bool,
}

impl RecordOutcome {
    pub fn result(&self) -> AttemptResult {
        self.record.result
    }

    /// Whether the caller should be let in
    pub fn is_authenticated(&self) -> bool {
        self.record.result == AttemptResult::Successful
    }
}

/// Appends exactly one ledger record per authentication event
pub struct AttemptRecorder<'a> {
    ledger: &'a dyn AttemptLedger,
    config: &'a BruteForceConfig,
}

impl<'a> AttemptRecorder<'a> {
    pub fn new(ledger: &'a dyn AttemptLedger, config: &'a BruteForceConfig) -> Self {
        Self { ledger, config }
    }

    /// Record an attempt by `remote` to authenticate as `login`
    ///
    /// An untrusted pair is recorded as `banned` even when `succeeded` is
    /// true: a correct credential does not lift a ban.
    pub fn record(
        &self,
        remote: &str,
        login: &str,
        succeeded: bool,
    ) -> Result<RecordOutcome, LedgerError> {
        let evaluator = TrustEvaluator::new(self.ledger, self.config);
        let verdict = evaluator.verdict(remote, login)?;

        let result = match (verdict, succeeded) {
            (Verdict::Trusted, true) => AttemptResult::Successful,
            (Verdict::Trusted, false) => AttemptResult::Failed,
            (reason, _) => {
                warn!(remote, login, ?reason, "Refusing authentication from untrusted pair");
                AttemptResult::Banned
            }
        };

        let record = self
            .ledger
            .append(NewAttempt::new(remote, login, result))?;
        let trusted_after = evaluator.is_trusted(remote, login)?;

        debug!(
            record_id = record.id,
            remote,
            login,
            result = %record.result,
            trusted_after,
            "Recorded authentication attempt"
        );

        Ok(RecordOutcome {
            record,
            trusted_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::AttemptFilter, services::ledger::MemoryLedger};

    #[test]
    fn test_ban_materializes_on_the_attempt_after_threshold() {
        let ledger = MemoryLedger::new();
        let config = BruteForceConfig::with_limits(3, 4);
        let recorder = AttemptRecorder::new(&ledger, &config);

        for n in 1..=3 {
            let outcome = recorder.record("10.0.0.1", "admin", false).unwrap();
            assert_eq!(outcome.result(), AttemptResult::Failed);
            assert_eq!(outcome.trusted_after, n < 3);
        }

        let outcome = recorder.record("10.0.0.1", "admin", true).unwrap();
        assert_eq!(outcome.result(), AttemptResult::Banned);
        assert!(!outcome.is_authenticated());
        assert!(!outcome.trusted_after);
    }

    #[test]
    fn test_trusted_success_is_recorded() {
        let ledger = MemoryLedger::new();
        let config = BruteForceConfig::with_limits(3, 4);
        let recorder = AttemptRecorder::new(&ledger, &config);

        recorder.record("10.0.0.1", "admin", false).unwrap();
        let outcome = recorder.record("10.0.0.1", "admin", true).unwrap();

        assert!(outcome.is_authenticated());
        assert!(outcome.trusted_after);
    }

    #[test]
    fn test_exactly_one_record_per_call() {
        let ledger = MemoryLedger::new();
        let config = BruteForceConfig::with_limits(1, 1);
        let recorder = AttemptRecorder::new(&ledger, &config);

        for _ in 0..5 {
            recorder.record("10.0.0.1", "admin", false).unwrap();
        }

        let all = ledger.search(&AttemptFilter::default()).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].result, AttemptResult::Failed);
        assert!(all[1..].iter().all(|r| r.result == AttemptResult::Banned));
    }
}
