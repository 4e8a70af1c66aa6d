//! Authentication-related data models.

use crate::models::attempt::AttemptResult;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Request model for user login
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Response model for login attempts
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct LoginResponse {
    pub result: AttemptResult,
    /// Whether the caller may still attempt to authenticate after this one
    pub trusted_after: bool,
    pub message: String,
}

/// Query parameters for the trust lookup endpoint
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct TrustQuery {
    pub remote: String,
    pub login: String,
}

/// Response model for the trust lookup endpoint
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct TrustResponse {
    pub remote: String,
    pub login: String,
    pub trusted: bool,
}
