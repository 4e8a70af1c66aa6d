//! Data models and schemas for the login shield.
//!
//! This module contains the attempt ledger data model, request/response
//! models for the HTTP surface, and audit types.

pub mod api;
pub mod attempt;
pub mod audit;
pub mod auth;

pub use api::*;
pub use attempt::*;
pub use audit::*;
pub use auth::*;
