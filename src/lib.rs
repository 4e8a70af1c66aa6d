//! Login Shield - brute-force protection for a login endpoint
//!
//! Every authentication attempt is appended to an attempt ledger. Before an
//! attempt is accepted the shield asks whether the (remote, login) pair is
//! trusted, counting the recent run of failures for the pair and for the
//! remote as a whole. Operators override the computed state by whitelisting,
//! banning or unbanning the pairs behind ledger records.
//!
//! ## Architecture
//!
//! - `services/` - the engine: `ledger`, `trust`, `recorder`, `admin`, and
//!   the [`BruteForceShield`] facade, plus credential checks and metrics
//! - `models/` - attempt records, API schemas and audit events
//! - `handlers/` - HTTP handlers and the app factory
//! - `middleware/` - request ID and request metrics middleware
//! - `config/` - configuration structures loaded from the environment
//! - `utils/` - request inspection and HMAC helpers
//!
//! ## Quick Start
//!
//! ```
//! use login_shield::{AttemptResult, BruteForceConfig, BruteForceShield};
//!
//! let shield = BruteForceShield::in_memory(BruteForceConfig::with_limits(3, 4));
//! for _ in 0..3 {
//!     shield.record("10.0.0.1", "admin", false).unwrap();
//! }
//! let outcome = shield.record("10.0.0.1", "admin", true).unwrap();
//! assert_eq!(outcome.result(), AttemptResult::Banned);
//! assert!(shield.is_trusted("10.0.0.1", "demo").unwrap());
//! ```

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{
    AdminAuthConfig, BruteForceConfig, CredentialsConfig, MetricsConfig, NetworkConfig,
};
pub use handlers::{
    AppState, ban, create_app, create_openapi_spec, get_metrics, health, list_attempts, login,
    trusted, unban, whitelist_add, whitelist_remove,
};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware};
pub use models::{
    AdminActionRequest, AttemptFilter, AttemptId, AttemptListQuery, AttemptListResponse,
    AttemptRecord, AttemptResult, AuthAuditEvent, AuthEventOutcome, AuthEventType,
    HealthResponse, LoginRequest, LoginResponse, NewAttempt, TrustQuery, TrustResponse,
};
pub use services::{
    AdminActions, AppMetrics, AttemptLedger, AttemptRecorder, BruteForceShield,
    CredentialVerifier, FailureCounts, LedgerError, MemoryLedger, RecordOutcome, ShieldError,
    StaticCredentials, TrustEvaluator, Verdict,
};
