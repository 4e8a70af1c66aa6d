//! Configuration structures and loading utilities.
//!
//! This module contains all configuration structures used by the application,
//! including environment variable loading and default values.

pub mod admin;
pub mod brute_force;
pub mod credentials;
pub mod metrics;
pub mod network;

pub use admin::*;
pub use brute_force::*;
pub use credentials::*;
pub use metrics::*;
pub use network::*;
