// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! The full portal router: sign-in, session, sign-out and the pages behind
//! the gate.
//!
//! ## Test Categories
//!
//! - `test_auth_*`: Credentials provider endpoints
//! - `test_portal_*`: Gated pages
//! - `test_server_*`: Router-level behavior

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use cardgate_api::ApiServer;
use cardgate_core::GatePolicy;
use cardgate_tests::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Test Helpers
// =============================================================================

fn router(policy: GatePolicy) -> Router {
    init_test_logging();
    ApiServer::new(PortalFixtures::state(policy)).router()
}

async fn send(router: &Router, req: Request<Body>) -> Response {
    router.clone().oneshot(req).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Signs in and returns the `name=value` pair to send back as a cookie.
async fn sign_in(router: &Router, prefix: &str, email: &str) -> String {
    let response = send(
        router,
        RequestFixtures::post_json(
            &format!("{prefix}/api/auth/callback/credentials"),
            json!({ "email": email, "password": PortalFixtures::PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookies(&response).into_iter().next().expect("session cookie");
    cookie.split(';').next().unwrap().to_string()
}

fn get_with(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// Credentials Provider
// =============================================================================

#[tokio::test]
async fn test_auth_sign_in_issues_cookie() {
    let router = router(PolicyFixtures::standard());

    let response = send(
        &router,
        RequestFixtures::post_json(
            "/api/auth/callback/credentials",
            json!({
                "email": "Admin@CampCard.org",
                "password": PortalFixtures::PASSWORD,
                "callbackUrl": "/offers?page=2"
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("next-auth.session-token="));
    assert!(cookies[0].contains("HttpOnly"));
    assert!(cookies[0].contains("SameSite=Lax"));
    assert!(cookies[0].contains("Path=/"));

    let body = json_body(response).await;
    assert_eq!(body["url"], "/offers?page=2");
    assert_eq!(body["session"]["user"]["id"], "admin-1");
    assert_eq!(body["session"]["user"]["role"], "ADMIN");
    assert_eq!(body["session"]["user"]["name"], "Alex Admin");
}

#[tokio::test]
async fn test_auth_sign_in_ignores_foreign_callback() {
    let router = router(PolicyFixtures::standard());

    for callback in [
        "https://evil.example/phish",
        "//evil.example",
        "/\t/evil.example",
        "/\n/evil.example",
    ] {
        let response = send(
            &router,
            RequestFixtures::post_json(
                "/api/auth/callback/credentials",
                json!({
                    "email": "admin@campcard.org",
                    "password": PortalFixtures::PASSWORD,
                    "callbackUrl": callback
                }),
            ),
        )
        .await;

        assert_eq!(json_body(response).await["url"], "/dashboard", "{callback:?}");
    }
}

#[tokio::test]
async fn test_auth_sign_in_wrong_password() {
    let router = router(PolicyFixtures::standard());

    let response = send(
        &router,
        RequestFixtures::post_json(
            "/api/auth/callback/credentials",
            json!({ "email": "admin@campcard.org", "password": "nope" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_auth_sign_in_bad_body() {
    let router = router(PolicyFixtures::standard());

    let response = send(
        &router,
        RequestFixtures::post_json("/api/auth/callback/credentials", json!({ "email": "" , "password": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &router,
        RequestFixtures::post_json("/api/auth/callback/credentials", json!({ "user": "x" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_sign_in_unavailable_without_issuer() {
    let state = PortalFixtures::state_with_verifier(
        PolicyFixtures::standard(),
        Arc::new(StaticVerifier::new()),
    );
    let router = ApiServer::new(state).router();

    let response = send(
        &router,
        RequestFixtures::post_json(
            "/api/auth/callback/credentials",
            json!({ "email": "admin@campcard.org", "password": PortalFixtures::PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_auth_session_endpoint() {
    let router = router(PolicyFixtures::standard());

    let response = send(&router, RequestFixtures::get("/api/auth/session")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({}));

    let cookie = sign_in(&router, "", "council@campcard.org").await;
    let response = send(&router, get_with("/api/auth/session", &cookie)).await;
    let body = json_body(response).await;
    assert_eq!(body["user"]["id"], "council-admin-1");
    assert_eq!(body["user"]["role"], "COUNCIL_ADMIN");
    assert_eq!(body["user"]["councilId"], "council-42");
    assert!(body["expires"].is_string());
}

#[tokio::test]
async fn test_auth_sign_out_expires_cookies() {
    let router = router(PolicyFixtures::standard());
    let cookie = sign_in(&router, "", "admin@campcard.org").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/signout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    assert!(cookies.iter().any(|c| c.starts_with("__Secure-next-auth.session-token=;")));
    assert_eq!(json_body(response).await["url"], "/login");
}

// =============================================================================
// Portal Pages
// =============================================================================

#[tokio::test]
async fn test_portal_signed_in_admin() {
    let router = router(PolicyFixtures::standard());
    let cookie = sign_in(&router, "", "admin@campcard.org").await;

    let response = send(&router, get_with("/dashboard", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = text_body(response).await;
    assert!(page.contains("<h1>Dashboard</h1>"));
    assert!(page.contains("Alex Admin"));

    let response = send(&router, get_with("/login", &cookie)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn test_portal_sign_out_form_follows_auth_prefix() {
    let policy = GatePolicy::builder()
        .api_auth_prefix("/auth")
        .build()
        .unwrap();
    let router = router(policy);
    let token = PortalFixtures::token_for(&ClaimsFixtures::admin());

    let response = send(&router, RequestFixtures::get_with_cookie("/dashboard", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = text_body(response).await;
    assert!(page.contains("action=\"/auth/signout\""));
    assert!(!page.contains("/api/auth/signout"));

    let request = Request::builder()
        .method("POST")
        .uri("/auth/signout")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response).len(), 2);
}

#[tokio::test]
async fn test_portal_public_page_without_session() {
    let router = router(PolicyFixtures::standard());

    let response = send(&router, RequestFixtures::get("/verify-email")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = text_body(response).await;
    assert!(page.contains("<h1>Verify Email</h1>"));
    assert!(!page.contains("Signed in as"));
}

#[tokio::test]
async fn test_portal_anonymous_is_sent_to_login() {
    let router = router(PolicyFixtures::standard());

    let response = send(&router, RequestFixtures::get("/troops?council=42")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?callbackUrl=%2Ftroops%3Fcouncil%3D42")
    );

    let response = send(&router, RequestFixtures::get("/login?callbackUrl=%2Ftroops")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("/troops"));
}

#[tokio::test]
async fn test_portal_scout_is_refused() {
    let router = router(PolicyFixtures::standard());
    let cookie = sign_in(&router, "", "scout@campcard.org").await;

    let response = send(&router, get_with("/scouts", &cookie)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let target = location(&response).unwrap();
    assert!(target.starts_with("/login?error=AccessDenied&message="));
    assert!(set_cookies(&response).is_empty());

    // The login page still renders for the refused session.
    let response = send(&router, get_with(&target, &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = text_body(response).await;
    assert!(page.contains("data-error=\"AccessDenied\""));
    assert!(page.contains("Your role (Scout) does not have access to the admin portal."));
}

#[tokio::test]
async fn test_portal_public_pages_open() {
    let router = router(PolicyFixtures::standard());

    for page in ["/forgot-password", "/reset-password", "/verify-email"] {
        let response = send(&router, RequestFixtures::get(page)).await;
        assert_eq!(response.status(), StatusCode::OK, "{page}");
    }
}

#[tokio::test]
async fn test_portal_unknown_page_for_signed_in_user() {
    let router = router(PolicyFixtures::standard());
    let cookie = sign_in(&router, "", "admin@campcard.org").await;

    let response = send(&router, get_with("/no-such-page", &cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Server
// =============================================================================

#[tokio::test]
async fn test_server_health_outside_gate() {
    let router = router(PolicyFixtures::standard());

    let response = send(&router, RequestFixtures::get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], cardgate_api::VERSION);
}

#[tokio::test]
async fn test_server_home_redirects() {
    let router = router(PolicyFixtures::standard());

    let response = send(&router, RequestFixtures::get("/")).await;
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?callbackUrl=%2F")
    );

    let cookie = sign_in(&router, "", "admin@campcard.org").await;
    let response = send(&router, get_with("/", &cookie)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn test_server_bearer_token() {
    let router = router(PolicyFixtures::standard());
    let token = PortalFixtures::token_for(&ClaimsFixtures::troop_leader());

    let response = send(&router, RequestFixtures::get_with_bearer("/offers", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_server_forged_token_is_anonymous() {
    let router = router(PolicyFixtures::standard());
    let forged = cardgate_api::JwtIssuer::new(cardgate_api::JwtConfig::new(
        "some-other-secret-that-is-long-enough!!",
    ))
    .unwrap()
    .issue(&ClaimsFixtures::admin())
    .unwrap();

    let response = send(&router, RequestFixtures::get_with_cookie("/users", &forged)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?callbackUrl=%2Fusers")
    );
}

#[tokio::test]
async fn test_server_base_path_end_to_end() {
    let router = router(PolicyFixtures::with_base_path("/portal"));

    let response = send(&router, RequestFixtures::get("/portal/offers")).await;
    assert_eq!(
        location(&response).as_deref(),
        Some("/portal/login?callbackUrl=%2Fportal%2Foffers")
    );

    let cookie = sign_in(&router, "/portal", "admin@campcard.org").await;
    let response = send(&router, get_with("/portal/offers", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, get_with("/portal/login", &cookie)).await;
    assert_eq!(location(&response).as_deref(), Some("/portal/dashboard"));
}
