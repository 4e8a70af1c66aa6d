//! HTTP utility functions for extracting request information.

use actix_web::{HttpMessage, HttpRequest};

// Checked in order of preference when forwarded headers are trusted
const FORWARDED_HEADERS: [&str; 4] = [
    "X-Forwarded-For",
    "X-Real-IP",
    "CF-Connecting-IP", // Cloudflare
    "X-Cluster-Client-IP",
];

fn forwarded_ip(req: &HttpRequest) -> Option<String> {
    FORWARDED_HEADERS.iter().find_map(|name| {
        let value = req.headers().get(*name)?.to_str().ok()?;
        // X-Forwarded-For can contain multiple IPs, the client is the first one
        let ip = value.split(',').next()?.trim();
        (!ip.is_empty()).then(|| ip.to_string())
    })
}

/// Address identity of the caller, as used for brute-force accounting
///
/// Proxy headers are only honoured when `trust_forwarded` is set, since a
/// client can write them freely and would otherwise pick its own remote.
pub fn extract_remote(req: &HttpRequest, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(ip) = forwarded_ip(req) {
            return ip;
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Best-effort client IP for logging, preferring proxy headers
pub fn extract_client_ip(req: &HttpRequest) -> String {
    extract_remote(req, true)
}

/// Request ID assigned by the request ID middleware, if any
pub fn extract_request_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<String>().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_remote_ignores_forwarded_headers_by_default() {
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:4711".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
            .to_http_request();

        assert_eq!(extract_remote(&req, false), "10.0.0.1");
        assert_eq!(extract_remote(&req, true), "203.0.113.9");
    }

    #[test]
    fn test_remote_without_peer() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_remote(&req, false), "unknown");
    }
}
