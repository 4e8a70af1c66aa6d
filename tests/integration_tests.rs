//! HTTP integration tests against the full application.

use actix_web::{
    http::{Method, StatusCode},
    test,
};
use login_shield::{
    AdminAuthConfig, AppState, AttemptListResponse, AttemptResult, BruteForceConfig,
    BruteForceShield, CredentialsConfig, LoginRequest, LoginResponse, StaticCredentials,
    TrustResponse, create_app,
    utils::hmac::{canonical_request, generate_signature, unix_now},
};
use std::{net::SocketAddr, sync::Arc};

const ADMIN_SECRET: &str = "admin-secret";

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn state() -> AppState {
    let shield = BruteForceShield::in_memory(BruteForceConfig::with_limits(3, 4));
    let credentials = CredentialsConfig::default()
        .with_user("admin", "password123")
        .with_user("demo", "demo");
    AppState::new(shield)
        .unwrap()
        .with_verifier(Arc::new(StaticCredentials::new(credentials)))
        .with_admin_auth(AdminAuthConfig::signed(ADMIN_SECRET))
}

fn signed_request(secret: &str, method: Method, uri: &str, body: &str) -> test::TestRequest {
    let now = unix_now().unwrap();
    let payload = canonical_request(method.as_str(), uri, body);
    let signature = generate_signature(secret, &payload, now).unwrap();
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header(("X-Signature", signature))
        .insert_header(("X-Timestamp", now.to_string()))
        .set_payload(body.to_string())
}

fn admin_get(uri: &str) -> test::TestRequest {
    signed_request(ADMIN_SECRET, Method::GET, uri, "")
}

fn admin_post(uri: &str, body: serde_json::Value) -> test::TestRequest {
    signed_request(ADMIN_SECRET, Method::POST, uri, &body.to_string())
}

fn login_request(login: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        })
}

#[actix_web::test]
async fn test_health_endpoint_integration() {
    let app = test::init_service(create_app(state())).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "Expected 200 OK status");
    assert!(resp.headers().contains_key("x-request-id"));

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json, serde_json::json!({ "status": "healthy" }));
}

#[actix_web::test]
async fn test_login_is_banned_after_three_failures() {
    let app = test::init_service(create_app(state())).await;

    for _ in 0..3 {
        let resp = test::call_service(&app, login_request("admin", "1234").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: LoginResponse = test::read_body_json(resp).await;
        assert_eq!(body.result, AttemptResult::Failed);
    }

    // Now the password is right, but the pair is banned
    let resp = test::call_service(&app, login_request("admin", "password123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: LoginResponse = test::read_body_json(resp).await;
    assert_eq!(body.result, AttemptResult::Banned);
    assert!(!body.trusted_after);

    let req = test::TestRequest::get()
        .uri("/auth/trusted?remote=127.0.0.1&login=admin")
        .to_request();
    let trust: TrustResponse = test::call_and_read_body_json(&app, req).await;
    assert!(!trust.trusted);

    let req = test::TestRequest::get()
        .uri("/auth/trusted?remote=127.0.0.1&login=demo")
        .to_request();
    let trust: TrustResponse = test::call_and_read_body_json(&app, req).await;
    assert!(trust.trusted);
}

#[actix_web::test]
async fn test_admin_unban_restores_login() {
    let app = test::init_service(create_app(state())).await;

    for _ in 0..3 {
        test::call_service(&app, login_request("admin", "1234").to_request()).await;
    }
    test::call_service(&app, login_request("admin", "password123").to_request()).await;

    let req = admin_get("/admin/attempts?result=banned&login=admin").to_request();
    let banned: AttemptListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(banned.count, 1);
    let banned_id = banned.records[0].id;

    let req = admin_post("/admin/attempts/unban", serde_json::json!({ "ids": [banned_id] }))
        .to_request();
    let unbanned: AttemptListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unbanned.count, 1);
    assert_eq!(unbanned.records[0].result, AttemptResult::Unbanned);

    let resp = test::call_service(&app, login_request("admin", "password123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: LoginResponse = test::read_body_json(resp).await;
    assert_eq!(body.result, AttemptResult::Successful);
}

#[actix_web::test]
async fn test_admin_whitelist_and_ban() {
    let app = test::init_service(create_app(state())).await;

    let resp = test::call_service(&app, login_request("admin", "password123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = admin_post("/admin/attempts/ban", serde_json::json!({ "ids": [1] })).to_request();
    let appended: AttemptListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(appended.count, 1);
    assert!(appended.records[0].banned());

    let resp = test::call_service(&app, login_request("admin", "password123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = admin_post(
        "/admin/attempts/whitelist",
        serde_json::json!({ "ids": [appended.records[0].id] }),
    )
    .to_request();
    let updated: AttemptListResponse = test::call_and_read_body_json(&app, req).await;
    assert!(updated.records[0].whitelisted);

    let resp = test::call_service(&app, login_request("admin", "password123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_unknown_record_is_not_found() {
    let app = test::init_service(create_app(state())).await;

    let req = admin_post("/admin/attempts/whitelist", serde_json::json!({ "ids": [99] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_admin_rejects_malformed_body() {
    let app = test::init_service(create_app(state())).await;

    let req =
        signed_request(ADMIN_SECRET, Method::POST, "/admin/attempts/ban", "not json").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_admin_signature_required() {
    let app = test::init_service(create_app(state())).await;

    let body = r#"{"ids":[]}"#;
    let req = test::TestRequest::post()
        .uri("/admin/attempts/ban")
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = signed_request("wrong-secret", Method::POST, "/admin/attempts/ban", body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = signed_request(ADMIN_SECRET, Method::POST, "/admin/attempts/ban", body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_listing_signature_covers_query() {
    let app = test::init_service(create_app(state())).await;

    let now = unix_now().unwrap();
    let payload = canonical_request("GET", "/admin/attempts?login=demo", "");
    let signature = generate_signature(ADMIN_SECRET, &payload, now).unwrap();

    let req = test::TestRequest::get()
        .uri("/admin/attempts?login=admin")
        .insert_header(("X-Signature", signature.clone()))
        .insert_header(("X-Timestamp", now.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/admin/attempts?login=demo")
        .insert_header(("X-Signature", signature))
        .insert_header(("X-Timestamp", now.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_disabled_without_secret() {
    let shield = BruteForceShield::in_memory(BruteForceConfig::with_limits(3, 4));
    let app = test::init_service(create_app(AppState::new(shield).unwrap())).await;

    for _ in 0..4 {
        test::call_service(&app, login_request("admin", "1234").to_request()).await;
    }

    let req = test::TestRequest::get()
        .uri("/admin/attempts?remote=127.0.0.1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let req = test::TestRequest::post()
        .uri("/admin/attempts/whitelist")
        .set_json(serde_json::json!({ "ids": [1, 2, 3, 4] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Signing with a guessed secret does not help either
    let req = signed_request(
        "guess",
        Method::POST,
        "/admin/attempts/whitelist",
        r#"{"ids":[1,2,3,4]}"#,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = test::call_service(&app, login_request("admin", "1234").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_default_state_accepts_no_credentials() {
    let shield = BruteForceShield::in_memory(BruteForceConfig::with_limits(3, 4));
    let app = test::init_service(create_app(AppState::new(shield).unwrap())).await;

    let resp = test::call_service(&app, login_request("admin", "password123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_metrics_count_attempts() {
    let app = test::init_service(create_app(state())).await;

    test::call_service(&app, login_request("admin", "1234").to_request()).await;
    test::call_service(&app, login_request("admin", "password123").to_request()).await;

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("auth_attempts_total{result=\"failed\"} 1"));
    assert!(text.contains("auth_attempts_total{result=\"successful\"} 1"));
    assert!(text.contains("http_requests_total"));
}

#[actix_web::test]
async fn test_openapi_spec_lists_routes() {
    let app = test::init_service(create_app(state())).await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["info"]["title"], "Login Shield");
    assert!(json["paths"].get("/auth/login").is_some());
    assert!(json["paths"].get("/admin/attempts/unban").is_some());
}
