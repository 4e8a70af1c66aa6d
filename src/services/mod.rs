//! Business logic and service layer modules.
//!
//! The brute-force engine lives here: the attempt ledger, trust evaluation,
//! the attempt recorder and administrative actions, tied together by
//! [`BruteForceShield`]. Credential checks and metrics sit alongside.

pub mod admin;
pub mod auth;
pub mod ledger;
pub mod metrics;
pub mod recorder;
pub mod shield;
pub mod trust;

pub use admin::*;
pub use auth::*;
pub use ledger::*;
pub use metrics::*;
pub use recorder::*;
pub use shield::*;
pub use trust::*;
