//! Authentication endpoint handlers.

use crate::{
    config::NetworkConfig,
    models::{
        AttemptResult, AuthAuditEvent, AuthEventType, LoginRequest, LoginResponse, TrustQuery,
        TrustResponse,
    },
    services::{AppMetrics, BruteForceShield, CredentialVerifier},
    utils::{extract_remote, extract_request_id},
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, error, http::StatusCode, web};
use paperclip::actix::api_v2_operation;
use std::sync::Arc;

pub(crate) fn shield(req: &HttpRequest) -> Result<&web::Data<BruteForceShield>, Error> {
    req.app_data::<web::Data<BruteForceShield>>()
        .ok_or_else(|| error::ErrorServiceUnavailable("Brute-force shield not configured"))
}

fn trust_forwarded(req: &HttpRequest) -> bool {
    req.app_data::<web::Data<NetworkConfig>>()
        .is_some_and(|c| c.trust_forwarded_headers)
}

/// User login endpoint
///
/// Checks the credentials, then records the attempt with the brute-force
/// shield. A banned remote/login pair is refused even with a correct
/// password.
#[api_v2_operation(
    summary = "User Login",
    description = "Authenticate a login and record the attempt for brute-force detection",
    tags("Authentication"),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Login failed", body = LoginResponse),
        (status = 403, description = "Remote/login pair banned", body = LoginResponse)
    )
)]
pub async fn login(
    req: HttpRequest,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, Error> {
    let shield = shield(&req)?;
    let verifier = req
        .app_data::<web::Data<Arc<dyn CredentialVerifier>>>()
        .ok_or_else(|| error::ErrorServiceUnavailable("Credential verifier not configured"))?;
    let remote = extract_remote(&req, trust_forwarded(&req));

    let succeeded = verifier.verify(&payload.login, &payload.password);
    let outcome = shield.record(&remote, &payload.login, succeeded)?;

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_attempt(outcome.result());
    }

    AuthAuditEvent::from_record(AuthEventType::for_result(outcome.result()), &outcome.record)
        .with_request_id(extract_request_id(&req))
        .log();

    let (status, message) = match outcome.result() {
        AttemptResult::Successful => (StatusCode::OK, "Login successful"),
        AttemptResult::Banned => (
            StatusCode::FORBIDDEN,
            "Too many failed attempts, authentication refused",
        ),
        _ => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };

    Ok(HttpResponse::build(status).json(LoginResponse {
        result: outcome.result(),
        trusted_after: outcome.trusted_after,
        message: message.to_string(),
    }))
}

/// Trust lookup endpoint
///
/// Read-only: reports whether the pair may currently authenticate without
/// recording anything.
#[api_v2_operation(
    summary = "Trust Lookup",
    description = "Report whether a remote/login pair is currently trusted",
    tags("Authentication"),
    responses(
        (status = 200, description = "Trust state", body = TrustResponse)
    )
)]
pub async fn trusted(
    req: HttpRequest,
    query: web::Query<TrustQuery>,
) -> Result<web::Json<TrustResponse>, Error> {
    let query = query.into_inner();
    let trusted = shield(&req)?.is_trusted(&query.remote, &query.login)?;

    Ok(web::Json(TrustResponse {
        remote: query.remote,
        login: query.login,
        trusted,
    }))
}
