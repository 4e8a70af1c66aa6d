//! Audit logging data structures and types.

use crate::models::attempt::{AttemptId, AttemptRecord, AttemptResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of events written to the authentication audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventType {
    LoginSuccess,
    LoginFailure,
    LoginBanned,
    WhitelistAdd,
    WhitelistRemove,
    ManualBan,
    Unban,
}

impl AuthEventType {
    /// Audit event type for a record appended by the recorder
    pub fn for_result(result: AttemptResult) -> Self {
        match result {
            AttemptResult::Successful => AuthEventType::LoginSuccess,
            AttemptResult::Failed => AuthEventType::LoginFailure,
            AttemptResult::Banned => AuthEventType::LoginBanned,
            AttemptResult::Unbanned => AuthEventType::Unban,
        }
    }
}

/// Outcomes of authentication events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventOutcome {
    Success,
    Failure,
    Refused,
}

/// Structured audit log entry for attempts and administrative actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAuditEvent {
    pub event_type: AuthEventType,
    pub outcome: AuthEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub remote: String,
    pub login: String,
    pub record_id: Option<AttemptId>,
    pub request_id: Option<String>,
    pub additional_context: Option<String>,
}

impl AuthAuditEvent {
    /// Create a new audit event with basic information
    pub fn new(
        event_type: AuthEventType,
        outcome: AuthEventOutcome,
        remote: String,
        login: String,
    ) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            remote,
            login,
            record_id: None,
            request_id: None,
            additional_context: None,
        }
    }

    /// Build the audit event describing a ledger record
    pub fn from_record(event_type: AuthEventType, record: &AttemptRecord) -> Self {
        let outcome = match record.result {
            AttemptResult::Successful | AttemptResult::Unbanned => AuthEventOutcome::Success,
            AttemptResult::Failed => AuthEventOutcome::Failure,
            AttemptResult::Banned => AuthEventOutcome::Refused,
        };
        let mut event = Self::new(
            event_type,
            outcome,
            record.remote.clone(),
            record.login.clone(),
        );
        event.timestamp = record.timestamp;
        event.record_id = Some(record.id);
        event
    }

    /// Add request ID information
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Add additional context information
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.additional_context = context;
        self
    }

    /// Log the audit event using structured logging
    pub fn log(&self) {
        if self.outcome == AuthEventOutcome::Refused {
            warn!(
                target: "auth_audit",
                event_type = ?self.event_type,
                outcome = ?self.outcome,
                timestamp = %self.timestamp,
                remote = %self.remote,
                login = %self.login,
                record_id = ?self.record_id,
                request_id = ?self.request_id,
                additional_context = ?self.additional_context,
                "Authentication refused"
            );
            return;
        }

        info!(
            target: "auth_audit",
            event_type = ?self.event_type,
            outcome = ?self.outcome,
            timestamp = %self.timestamp,
            remote = %self.remote,
            login = %self.login,
            record_id = ?self.record_id,
            request_id = ?self.request_id,
            additional_context = ?self.additional_context,
            "Authentication audit event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_banned_record_is_refused() {
        let record = AttemptRecord {
            id: 7,
            remote: "10.0.0.1".to_string(),
            login: "admin".to_string(),
            result: AttemptResult::Banned,
            timestamp: Utc::now(),
            whitelisted: false,
        };

        let event = AuthAuditEvent::from_record(AuthEventType::LoginBanned, &record)
            .with_request_id(Some("req-1".to_string()));

        assert_eq!(event.outcome, AuthEventOutcome::Refused);
        assert_eq!(event.record_id, Some(7));
        assert_eq!(event.timestamp, record.timestamp);
        assert_eq!(event.request_id.as_deref(), Some("req-1"));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "login_banned");
        assert_eq!(json["outcome"], "refused");
    }
}
