//! Health check endpoint handler.

use crate::{
    handlers::auth::shield,
    models::{AttemptFilter, HealthResponse},
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Reports `healthy` when the attempt ledger answers queries and
/// `degraded` when it does not.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the service in JSON format.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<HealthResponse>, Error> {
    let sample = AttemptFilter {
        limit: Some(1),
        ..AttemptFilter::default()
    };
    let status = match shield(&req).map(|s| s.search(&sample)) {
        Ok(Ok(_)) => "healthy",
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Attempt ledger health probe failed");
            "degraded"
        }
        Err(_) => "degraded",
    };

    Ok(web::Json(HealthResponse {
        status: status.to_string(),
    }))
}
