//! Shared entry point to the brute-force engine.

use crate::{
    config::BruteForceConfig,
    models::{AttemptFilter, AttemptId, AttemptRecord},
    services::{
        admin::AdminActions,
        ledger::{AttemptLedger, LedgerError, MemoryLedger},
        recorder::{AttemptRecorder, RecordOutcome},
        trust::{TrustEvaluator, Verdict},
    },
};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Errors surfaced by the shield
#[derive(Debug, thiserror::Error)]
pub enum ShieldError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("shield state unavailable: {0}")]
    Poisoned(String),
}

impl ResponseError for ShieldError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShieldError::Ledger(LedgerError::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            ShieldError::Ledger(LedgerError::Unavailable(_)) | ShieldError::Poisoned(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.status_code().canonical_reason().unwrap_or("Error"),
            "message": self.to_string()
        }))
    }
}

/// Thread-safe handle owning the ledger and the live configuration
///
/// Reads (`is_trusted`, `search`) go straight to the ledger. Writes are
/// serialized through a gate so each read-then-append sees the previous
/// write, which keeps concurrent attempts from the same pair from
/// under-counting.
#[derive(Clone)]
pub struct BruteForceShield {
    ledger: Arc<dyn AttemptLedger>,
    config: Arc<RwLock<BruteForceConfig>>,
    write_gate: Arc<Mutex<()>>,
}

impl BruteForceShield {
    pub fn new(ledger: Arc<dyn AttemptLedger>, config: BruteForceConfig) -> Self {
        Self {
            ledger,
            config: Arc::new(RwLock::new(config)),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Shield over a fresh in-memory ledger
    pub fn in_memory(config: BruteForceConfig) -> Self {
        Self::new(Arc::new(MemoryLedger::new()), config)
    }

    /// Snapshot of the configuration used for the next evaluation
    pub fn config(&self) -> Result<BruteForceConfig, ShieldError> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|e| ShieldError::Poisoned(e.to_string()))
    }

    /// Replace the configuration; later evaluations use the new values
    pub fn set_config(&self, config: BruteForceConfig) -> Result<(), ShieldError> {
        let mut current = self
            .config
            .write()
            .map_err(|e| ShieldError::Poisoned(e.to_string()))?;
        tracing::info!(
            max_by_ip_user = config.max_by_ip_user,
            max_by_ip = config.max_by_ip,
            whitelist_remotes = config.whitelist_remotes.len(),
            "Brute-force configuration updated"
        );
        *current = config;
        Ok(())
    }

    pub fn ledger(&self) -> &dyn AttemptLedger {
        self.ledger.as_ref()
    }

    /// Whether `remote` may currently attempt to authenticate as `login`
    pub fn is_trusted(&self, remote: &str, login: &str) -> Result<bool, ShieldError> {
        Ok(self.verdict(remote, login)?.is_trusted())
    }

    pub fn verdict(&self, remote: &str, login: &str) -> Result<Verdict, ShieldError> {
        let config = self.config()?;
        Ok(TrustEvaluator::new(self.ledger(), &config).verdict(remote, login)?)
    }

    /// Record an authentication attempt and decide its stored outcome
    pub fn record(
        &self,
        remote: &str,
        login: &str,
        succeeded: bool,
    ) -> Result<RecordOutcome, ShieldError> {
        let config = self.config()?;
        let _gate = self.gate()?;
        Ok(AttemptRecorder::new(self.ledger(), &config).record(remote, login, succeeded)?)
    }

    pub fn whitelist_add(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, ShieldError> {
        let config = self.config()?;
        let _gate = self.gate()?;
        Ok(AdminActions::new(self.ledger(), &config).whitelist_add(ids)?)
    }

    pub fn whitelist_remove(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, ShieldError> {
        let config = self.config()?;
        let _gate = self.gate()?;
        Ok(AdminActions::new(self.ledger(), &config).whitelist_remove(ids)?)
    }

    pub fn unban(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, ShieldError> {
        let config = self.config()?;
        let _gate = self.gate()?;
        Ok(AdminActions::new(self.ledger(), &config).unban(ids)?)
    }

    pub fn ban(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, ShieldError> {
        let config = self.config()?;
        let _gate = self.gate()?;
        Ok(AdminActions::new(self.ledger(), &config).ban(ids)?)
    }

    /// List ledger records matching the filter, oldest first
    pub fn search(&self, filter: &AttemptFilter) -> Result<Vec<AttemptRecord>, ShieldError> {
        Ok(self.ledger.search(filter)?)
    }

    /// Drop every ledger record
    pub fn purge(&self) -> Result<usize, ShieldError> {
        let _gate = self.gate()?;
        let removed = self.ledger.purge()?;
        tracing::warn!(removed, "Attempt ledger purged");
        Ok(removed)
    }

    fn gate(&self) -> Result<MutexGuard<'_, ()>, ShieldError> {
        self.write_gate
            .lock()
            .map_err(|e| ShieldError::Poisoned(e.to_string()))
    }
}
