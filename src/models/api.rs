//! API response models for standard and administrative endpoints.

use crate::models::attempt::{AttemptId, AttemptRecord, AttemptResult};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Query parameters for listing ledger records
#[derive(Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct AttemptListQuery {
    pub remote: Option<String>,
    pub login: Option<String>,
    pub result: Option<AttemptResult>,
    pub whitelisted: Option<bool>,
    pub limit: Option<usize>,
}

/// Request body for the administrative record actions
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct AdminActionRequest {
    pub ids: Vec<AttemptId>,
}

/// Response model carrying a set of ledger records
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct AttemptListResponse {
    pub count: usize,
    pub records: Vec<AttemptRecord>,
}

impl From<Vec<AttemptRecord>> for AttemptListResponse {
    fn from(records: Vec<AttemptRecord>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }
}
