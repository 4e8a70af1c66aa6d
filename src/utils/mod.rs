//! Utility functions and helper modules.
//!
//! This module contains request inspection helpers (remote address, request
//! ID, route pattern) and HMAC signing utilities.

pub mod hmac;
pub mod http;
pub mod route;

pub use self::hmac::*;
pub use http::*;
pub use route::*;
