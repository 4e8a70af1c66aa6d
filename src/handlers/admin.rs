//! Administrative endpoints over the attempt ledger.
//!
//! Every mutating endpoint takes `{"ids": [...]}` and answers with the
//! records it updated or appended. Every request, listing included, must be
//! signed, see [`crate::services::verify_admin_signature`].

use crate::{
    config::AdminAuthConfig,
    handlers::auth::shield,
    models::{
        AdminActionRequest, AttemptFilter, AttemptListQuery, AttemptListResponse, AttemptRecord,
        AuthAuditEvent, AuthEventType,
    },
    services::{AppMetrics, BruteForceShield, ShieldError, verify_admin_signature},
    utils::extract_request_id,
};
use actix_web::{Error, HttpRequest, Result, error, web};
use paperclip::actix::api_v2_operation;

#[derive(Clone, Copy)]
enum AdminAction {
    WhitelistAdd,
    WhitelistRemove,
    Ban,
    Unban,
}

impl AdminAction {
    fn label(self) -> &'static str {
        match self {
            AdminAction::WhitelistAdd => "whitelist_add",
            AdminAction::WhitelistRemove => "whitelist_remove",
            AdminAction::Ban => "ban",
            AdminAction::Unban => "unban",
        }
    }

    fn event_type(self) -> AuthEventType {
        match self {
            AdminAction::WhitelistAdd => AuthEventType::WhitelistAdd,
            AdminAction::WhitelistRemove => AuthEventType::WhitelistRemove,
            AdminAction::Ban => AuthEventType::ManualBan,
            AdminAction::Unban => AuthEventType::Unban,
        }
    }

    fn apply(
        self,
        shield: &BruteForceShield,
        ids: &[u64],
    ) -> Result<Vec<AttemptRecord>, ShieldError> {
        match self {
            AdminAction::WhitelistAdd => shield.whitelist_add(ids),
            AdminAction::WhitelistRemove => shield.whitelist_remove(ids),
            AdminAction::Ban => shield.ban(ids),
            AdminAction::Unban => shield.unban(ids),
        }
    }
}

fn authorize(req: &HttpRequest, body: &[u8]) -> Result<(), Error> {
    let Some(config) = req.app_data::<web::Data<AdminAuthConfig>>() else {
        return Err(error::ErrorServiceUnavailable(
            "Administrative endpoints are not configured",
        ));
    };
    let body = std::str::from_utf8(body).map_err(|_| error::ErrorBadRequest("Body is not UTF-8"))?;
    verify_admin_signature(req, body, config)
}

async fn run_action(
    req: HttpRequest,
    body: web::Bytes,
    action: AdminAction,
) -> Result<web::Json<AttemptListResponse>, Error> {
    authorize(&req, &body)?;
    let request: AdminActionRequest = serde_json::from_slice(&body)
        .map_err(|e| error::ErrorBadRequest(format!("Invalid request body: {e}")))?;

    let records = action.apply(shield(&req)?, &request.ids)?;

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_admin_action(action.label(), records.len());
    }
    let request_id = extract_request_id(&req);
    for record in &records {
        AuthAuditEvent::from_record(action.event_type(), record)
            .with_request_id(request_id.clone())
            .with_context(Some(format!("requested ids: {:?}", request.ids)))
            .log();
    }

    Ok(web::Json(records.into()))
}

/// List ledger records
#[api_v2_operation(
    summary = "List Attempts",
    description = "List recorded authentication attempts, oldest first, filtered by remote, login, result or whitelist flag",
    tags("Administration"),
    responses(
        (status = 200, description = "Matching records", body = AttemptListResponse),
        (status = 401, description = "Unauthorized - Invalid or missing HMAC signature"),
        (status = 503, description = "Administrative endpoints are not configured")
    )
)]
pub async fn list_attempts(
    req: HttpRequest,
    query: web::Query<AttemptListQuery>,
) -> Result<web::Json<AttemptListResponse>, Error> {
    authorize(&req, b"")?;
    let query = query.into_inner();
    let filter = AttemptFilter {
        remote: query.remote,
        login: query.login,
        result: query.result,
        whitelisted: query.whitelisted,
        limit: query.limit,
    };

    Ok(web::Json(shield(&req)?.search(&filter)?.into()))
}

/// Whitelist records
#[api_v2_operation(
    summary = "Whitelist Attempts",
    description = "Flag records as whitelisted; their remote/login pairs become permanently trusted",
    tags("Administration"),
    responses(
        (status = 200, description = "Updated records", body = AttemptListResponse),
        (status = 404, description = "Unknown record id")
    )
)]
pub async fn whitelist_add(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<AttemptListResponse>, Error> {
    run_action(req, body, AdminAction::WhitelistAdd).await
}

/// Remove records from the whitelist
#[api_v2_operation(
    summary = "Unwhitelist Attempts",
    description = "Clear the whitelist flag; trust is computed from history again",
    tags("Administration"),
    responses(
        (status = 200, description = "Updated records", body = AttemptListResponse),
        (status = 404, description = "Unknown record id")
    )
)]
pub async fn whitelist_remove(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<AttemptListResponse>, Error> {
    run_action(req, body, AdminAction::WhitelistRemove).await
}

/// Manually ban the pairs behind records
#[api_v2_operation(
    summary = "Ban Attempts",
    description = "Append a banned record for each targeted remote/login pair not already banned",
    tags("Administration"),
    responses(
        (status = 200, description = "Appended records", body = AttemptListResponse),
        (status = 404, description = "Unknown record id")
    )
)]
pub async fn ban(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<AttemptListResponse>, Error> {
    run_action(req, body, AdminAction::Ban).await
}

/// Lift the bans behind records
#[api_v2_operation(
    summary = "Unban Attempts",
    description = "Append an unbanned record for each targeted banned pair, resetting its failure count",
    tags("Administration"),
    responses(
        (status = 200, description = "Appended records", body = AttemptListResponse),
        (status = 404, description = "Unknown record id")
    )
)]
pub async fn unban(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<AttemptListResponse>, Error> {
    run_action(req, body, AdminAction::Unban).await
}
