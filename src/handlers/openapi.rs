//! OpenAPI specification generation and app factory.

use crate::{
    config::{AdminAuthConfig, BruteForceConfig, CredentialsConfig, MetricsConfig, NetworkConfig},
    handlers::{
        ban, get_metrics, health, list_attempts, login, trusted, unban, whitelist_add,
        whitelist_remove,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    services::{AppMetrics, BruteForceShield, CredentialVerifier, StaticCredentials},
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};
use std::sync::Arc;

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Login Shield".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Brute-force protection for a login endpoint.\n\n\
                ## Trust model\n\
                Every authentication attempt is appended to an attempt ledger as \
                `successful`, `failed` or `banned`. A remote/login pair becomes untrusted \
                once its run of failures since the last success or unban reaches \
                `AUTH_BRUTE_FORCE_MAX_BY_IP_USER`, or once the remote's run across all \
                logins reaches `AUTH_BRUTE_FORCE_MAX_BY_IP`. The ban takes effect on the \
                next attempt, which is recorded as `banned` even with a correct password.\n\
                \n\
                ## Administration\n\
                `/admin/attempts/*` endpoints whitelist, unwhitelist, ban or unban the \
                pairs behind ledger records. History is never deleted.\n\
                \n\
                **Signed requests** (refused with 503 while `ADMIN_HMAC_SECRET` is unset):\n\
                - `X-Signature`: hex HMAC-SHA256 with `ADMIN_HMAC_SECRET` of \
                `{timestamp}.{METHOD} {path_and_query}\\n{raw_body}`\n\
                - `X-Timestamp`: Unix timestamp in seconds, within `ADMIN_HMAC_TIMESTAMP_TOLERANCE`"
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Everything the handlers look up in app data
#[derive(Clone)]
pub struct AppState {
    pub shield: BruteForceShield,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub metrics: AppMetrics,
    pub metrics_config: MetricsConfig,
    pub admin_auth: AdminAuthConfig,
    pub network: NetworkConfig,
}

impl AppState {
    /// State around the given shield with default collaborators
    pub fn new(shield: BruteForceShield) -> Result<Self, prometheus::Error> {
        Ok(Self {
            shield,
            verifier: Arc::new(StaticCredentials::new(CredentialsConfig::default())),
            metrics: AppMetrics::new()?,
            metrics_config: MetricsConfig::default(),
            admin_auth: AdminAuthConfig::default(),
            network: NetworkConfig::default(),
        })
    }

    /// State loaded from environment variables over an in-memory ledger
    pub fn from_env() -> Result<Self, prometheus::Error> {
        let credentials = CredentialsConfig::from_env();
        if credentials.is_empty() {
            tracing::warn!("AUTH_USERS is not set, every login will be refused");
        }

        Ok(Self {
            shield: BruteForceShield::in_memory(BruteForceConfig::from_env()),
            verifier: Arc::new(StaticCredentials::new(credentials)),
            metrics: AppMetrics::new()?,
            metrics_config: MetricsConfig::from_env(),
            admin_auth: AdminAuthConfig::from_env(),
            network: NetworkConfig::from_env(),
        })
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_admin_auth(mut self, admin_auth: AdminAuthConfig) -> Self {
        self.admin_auth = admin_auth;
        self
    }
}

/// Creates the application with all routes and middleware
///
/// Used both by the binary and by the integration tests.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state.shield))
        .app_data(web::Data::new(state.verifier))
        .app_data(web::Data::new(state.metrics))
        .app_data(web::Data::new(state.metrics_config))
        .app_data(web::Data::new(state.admin_auth))
        .app_data(web::Data::new(state.network))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/auth/login").route(web::post().to(login)))
        .service(web::resource("/auth/trusted").route(web::get().to(trusted)))
        .service(web::resource("/admin/attempts").route(web::get().to(list_attempts)))
        .service(web::resource("/admin/attempts/whitelist").route(web::post().to(whitelist_add)))
        .service(
            web::resource("/admin/attempts/unwhitelist").route(web::post().to(whitelist_remove)),
        )
        .service(web::resource("/admin/attempts/ban").route(web::post().to(ban)))
        .service(web::resource("/admin/attempts/unban").route(web::post().to(unban)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
