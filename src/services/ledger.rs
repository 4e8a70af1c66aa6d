//! Attempt ledger storage.
//!
//! The ledger is the source of truth for every trust decision. Records are
//! only ever appended; the `whitelisted` flag is the single field that may
//! change after a record is written.

use crate::models::{AttemptFilter, AttemptId, AttemptRecord, NewAttempt};
use chrono::Utc;
use std::{
    collections::HashMap,
    ops::ControlFlow,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Errors raised by ledger storage
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("attempt record {0} not found")]
    RecordNotFound(AttemptId),

    #[error("attempt ledger unavailable: {0}")]
    Unavailable(String),
}

/// Storage seam for authentication attempt records
///
/// Implementations must keep records in insertion order and must never
/// rewrite `remote`, `login`, `result` or `timestamp` of an existing record.
pub trait AttemptLedger: Send + Sync {
    /// Append a record, assigning its id and timestamp
    fn append(&self, attempt: NewAttempt) -> Result<AttemptRecord, LedgerError>;

    /// Fetch records by id, in the order requested
    fn get(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, LedgerError>;

    /// Set the whitelist flag on the given records and return them
    fn set_whitelisted(
        &self,
        ids: &[AttemptId],
        whitelisted: bool,
    ) -> Result<Vec<AttemptRecord>, LedgerError>;

    /// Visit records of `remote` (and `login` when given), newest first,
    /// until the visitor breaks
    fn walk_back(
        &self,
        remote: &str,
        login: Option<&str>,
        visitor: &mut dyn FnMut(&AttemptRecord) -> ControlFlow<()>,
    ) -> Result<(), LedgerError>;

    /// Whether any record of the pair carries the whitelist flag
    fn pair_whitelisted(&self, remote: &str, login: &str) -> Result<bool, LedgerError>;

    /// Records matching the filter, oldest first
    fn search(&self, filter: &AttemptFilter) -> Result<Vec<AttemptRecord>, LedgerError>;

    /// Remove every record, returning how many were dropped
    fn purge(&self) -> Result<usize, LedgerError>;
}

/// In-process ledger backed by a vector in insertion order
///
/// Records are indexed per remote and per (remote, login) pair, so trust
/// queries only touch the history of the key being evaluated.
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    records: Vec<AttemptRecord>,
    remotes: HashMap<String, RemoteIndex>,
    last_id: AttemptId,
}

/// Positions into `LedgerState::records` for one remote, oldest first
#[derive(Default)]
struct RemoteIndex {
    positions: Vec<usize>,
    logins: HashMap<String, Vec<usize>>,
    /// Number of whitelisted records per login
    whitelisted: HashMap<String, usize>,
}

impl LedgerState {
    fn index(&mut self, position: usize) {
        let record = &self.records[position];
        let index = self.remotes.entry(record.remote.clone()).or_default();
        index.positions.push(position);
        index
            .logins
            .entry(record.login.clone())
            .or_default()
            .push(position);
    }

    fn positions(&self, remote: &str, login: Option<&str>) -> &[usize] {
        let Some(index) = self.remotes.get(remote) else {
            return &[];
        };
        match login {
            None => index.positions.as_slice(),
            Some(login) => index.logins.get(login).map(Vec::as_slice).unwrap_or_default(),
        }
    }

    fn set_flag(&mut self, position: usize, whitelisted: bool) {
        let record = &mut self.records[position];
        if record.whitelisted == whitelisted {
            return;
        }
        record.whitelisted = whitelisted;

        let Some(index) = self.remotes.get_mut(&record.remote) else {
            return;
        };
        let count = index.whitelisted.entry(record.login.clone()).or_default();
        if whitelisted {
            *count += 1;
        } else {
            *count = count.saturating_sub(1);
        }
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.state
            .read()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.state
            .write()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))
    }
}

// Ids are never reused, so records stay sorted by id even across purges.
fn position(records: &[AttemptRecord], id: AttemptId) -> Result<usize, LedgerError> {
    records
        .binary_search_by_key(&id, |r| r.id)
        .map_err(|_| LedgerError::RecordNotFound(id))
}

impl AttemptLedger for MemoryLedger {
    fn append(&self, attempt: NewAttempt) -> Result<AttemptRecord, LedgerError> {
        let mut state = self.write()?;
        state.last_id += 1;
        let record = AttemptRecord {
            id: state.last_id,
            remote: attempt.remote,
            login: attempt.login,
            result: attempt.result,
            timestamp: Utc::now(),
            whitelisted: false,
        };
        let position = state.records.len();
        state.records.push(record.clone());
        state.index(position);
        Ok(record)
    }

    fn get(&self, ids: &[AttemptId]) -> Result<Vec<AttemptRecord>, LedgerError> {
        let state = self.read()?;
        let records = &state.records;
        ids.iter()
            .map(|&id| position(records, id).map(|i| records[i].clone()))
            .collect()
    }

    fn set_whitelisted(
        &self,
        ids: &[AttemptId],
        whitelisted: bool,
    ) -> Result<Vec<AttemptRecord>, LedgerError> {
        let mut state = self.write()?;
        // Resolve every id first so an unknown id leaves the ledger untouched
        let positions = ids
            .iter()
            .map(|&id| position(&state.records, id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(positions
            .into_iter()
            .map(|i| {
                state.set_flag(i, whitelisted);
                state.records[i].clone()
            })
            .collect())
    }

    fn walk_back(
        &self,
        remote: &str,
        login: Option<&str>,
        visitor: &mut dyn FnMut(&AttemptRecord) -> ControlFlow<()>,
    ) -> Result<(), LedgerError> {
        let state = self.read()?;
        for &i in state.positions(remote, login).iter().rev() {
            if visitor(&state.records[i]).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn pair_whitelisted(&self, remote: &str, login: &str) -> Result<bool, LedgerError> {
        let state = self.read()?;
        Ok(state
            .remotes
            .get(remote)
            .and_then(|index| index.whitelisted.get(login))
            .is_some_and(|&count| count > 0))
    }

    fn search(&self, filter: &AttemptFilter) -> Result<Vec<AttemptRecord>, LedgerError> {
        let state = self.read()?;
        let mut found: Vec<AttemptRecord> = state
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        if let Some(limit) = filter.limit {
            let skip = found.len().saturating_sub(limit);
            found.drain(..skip);
        }
        Ok(found)
    }

    fn purge(&self) -> Result<usize, LedgerError> {
        let mut state = self.write()?;
        let removed = state.records.len();
        state.records.clear();
        state.remotes.clear();
        Ok(removed)
    }
}
