//! Credential checking and admin request authentication.

use crate::{
    config::{AdminAuthConfig, CredentialsConfig},
    utils::hmac,
};
use actix_web::{HttpRequest, error};

/// Checks a claimed login and password
///
/// Credential verification belongs to the host application; the shield only
/// needs to know whether it succeeded.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, login: &str, password: &str) -> bool;
}

/// Verifier backed by a fixed set of login/password pairs
pub struct StaticCredentials {
    config: CredentialsConfig,
}

impl StaticCredentials {
    pub fn new(config: CredentialsConfig) -> Self {
        Self { config }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, login: &str, password: &str) -> bool {
        self.config
            .users
            .get(login)
            .is_some_and(|expected| hmac::constant_time_eq(expected, password))
    }
}

fn header<'r>(req: &'r HttpRequest, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}

/// Validate the HMAC signature of an administrative request
///
/// The signature covers method, path with query, and body. Requests are
/// refused outright while no secret is configured.
pub fn verify_admin_signature(
    req: &HttpRequest,
    body: &str,
    config: &AdminAuthConfig,
) -> Result<(), actix_web::Error> {
    let Some(secret) = config.secret.as_deref() else {
        tracing::warn!(
            ip_address = %crate::utils::extract_client_ip(req),
            path = %req.path(),
            "Refused admin request: ADMIN_HMAC_SECRET is not set"
        );
        return Err(error::ErrorServiceUnavailable(
            "Administrative endpoints are not configured",
        ));
    };

    let signature = header(req, "X-Signature")
        .ok_or_else(|| error::ErrorUnauthorized("Missing X-Signature header"))?;

    let timestamp: u64 = header(req, "X-Timestamp")
        .ok_or_else(|| error::ErrorUnauthorized("Missing X-Timestamp header"))?
        .parse()
        .map_err(|_| error::ErrorUnauthorized("Invalid X-Timestamp format"))?;

    let path_and_query = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path(), |p| p.as_str());
    let payload = hmac::canonical_request(req.method().as_str(), path_and_query, body);

    match hmac::validate_signature(
        secret,
        &payload,
        timestamp,
        signature,
        config.timestamp_tolerance_seconds,
    ) {
        Ok(true) => Ok(()),
        Ok(false) | Err(hmac::SignatureError::Malformed) => {
            tracing::warn!(
                ip_address = %crate::utils::extract_client_ip(req),
                "Rejected admin request with invalid signature"
            );
            Err(error::ErrorUnauthorized("Invalid signature or timestamp"))
        }
        Err(e) => Err(error::ErrorInternalServerError(format!(
            "Signature validation error: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_static_credentials() {
        let verifier =
            StaticCredentials::new(CredentialsConfig::default().with_user("admin", "s3cret"));
        assert!(verifier.verify("admin", "s3cret"));
        assert!(!verifier.verify("admin", "1234"));
        assert!(!verifier.verify("nobody", "s3cret"));
    }

    #[test]
    fn test_default_credentials_accept_nobody() {
        let verifier = StaticCredentials::new(CredentialsConfig::default());
        assert!(!verifier.verify("admin", "password123"));
        assert!(!verifier.verify("admin", ""));
    }

    #[test]
    fn test_unconfigured_admin_refuses_everything() {
        let req = TestRequest::post().uri("/admin/attempts/ban").to_http_request();
        let err = verify_admin_signature(&req, "", &AdminAuthConfig::default()).unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_signed_request() {
        let config = AdminAuthConfig::signed("top-secret");
        let now = hmac::unix_now().unwrap();
        let body = r#"{"ids":[1]}"#;
        let payload = hmac::canonical_request("POST", "/admin/attempts/ban", body);
        let signature = hmac::generate_signature("top-secret", &payload, now).unwrap();

        let signed = |uri: &str| {
            TestRequest::post()
                .uri(uri)
                .insert_header(("X-Signature", signature.as_str()))
                .insert_header(("X-Timestamp", now.to_string()))
                .to_http_request()
        };
        let req = signed("/admin/attempts/ban");
        assert!(verify_admin_signature(&req, body, &config).is_ok());
        assert!(verify_admin_signature(&req, r#"{"ids":[2]}"#, &config).is_err());

        // Same body and signature replayed against another endpoint
        let replayed = signed("/admin/attempts/whitelist");
        assert!(verify_admin_signature(&replayed, body, &config).is_err());

        let unsigned = TestRequest::post().uri("/admin/attempts/ban").to_http_request();
        assert!(verify_admin_signature(&unsigned, body, &config).is_err());
    }
}
