//! HTTP request handlers for API endpoints.
//!
//! Thin adapters between HTTP and the brute-force shield: the login and
//! trust endpoints, the administrative ledger endpoints, and the usual
//! health and metrics endpoints.

pub mod admin;
pub mod auth;
pub mod health;
pub mod metrics;
pub mod openapi;

pub use admin::*;
pub use auth::*;
pub use health::*;
pub use metrics::*;
pub use openapi::*;
