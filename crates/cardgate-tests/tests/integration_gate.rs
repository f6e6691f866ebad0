// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Gate Integration Tests
//!
//! The access engine driven through a fake verifier, plus the tower layer
//! in front of a trivial service.
//!
//! ## Test Categories
//!
//! - `test_scenario_*`: The reference request scenarios
//! - `test_property_*`: Decision table properties over every token state
//! - `test_verifier_*`: Verifier failures
//! - `test_layer_*`: The tower layer

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use cardgate_api::GateLayer;
use cardgate_core::{AccessEngine, Claims, Credentials, Outcome, RouteClass};
use cardgate_tests::prelude::*;
use tower::{Layer, ServiceExt};

// =============================================================================
// Test Helpers
// =============================================================================

/// Every token state the engine can see.
fn token_states() -> Vec<Option<Claims>> {
    let mut states = vec![None];
    states.extend(ClaimsFixtures::all_roles().into_iter().map(Some));
    states
}

fn engine() -> AccessEngine {
    AccessEngine::new(PolicyFixtures::standard())
}

async fn evaluate(path: &str, claims: Option<Claims>) -> Outcome {
    init_test_logging();

    let mut verifier = StaticVerifier::new();
    let credentials = match claims {
        Some(claims) => {
            verifier = verifier.with_token("session", claims);
            Credentials::from_cookie(SESSION_COOKIE, "session")
        }
        None => Credentials::none(),
    };

    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };

    engine()
        .evaluate(&verifier, path, query, &credentials)
        .await
        .outcome
}

async fn through_layer(engine: AccessEngine, req: Request<Body>) -> Response {
    let verifier = StaticVerifier::new()
        .with_token("admin", ClaimsFixtures::admin())
        .with_token("scout", ClaimsFixtures::scout());

    let inner = tower::service_fn(|req: Request<Body>| async move {
        let body = match req.extensions().get::<Claims>() {
            Some(claims) => format!("hello {}", claims.user_id()),
            None => "hello stranger".to_string(),
        };
        Ok::<_, Infallible>(Response::new(Body::from(body)))
    });

    GateLayer::new(engine, Arc::new(verifier))
        .layer(inner)
        .oneshot(req)
        .await
        .unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_scenario_protected_without_session() {
    let outcome = evaluate("/dashboard", None).await;
    assert_eq!(
        outcome.location().as_deref(),
        Some("/login?callbackUrl=%2Fdashboard")
    );
}

#[tokio::test]
async fn test_scenario_login_without_session() {
    assert_eq!(evaluate("/login", None).await, Outcome::Allow);
}

#[tokio::test]
async fn test_scenario_login_with_admin_session() {
    let outcome = evaluate("/login", Some(ClaimsFixtures::admin())).await;
    assert_eq!(
        outcome,
        Outcome::RedirectAway {
            target: "/dashboard".to_string()
        }
    );
}

#[tokio::test]
async fn test_scenario_scout_is_denied() {
    let outcome = evaluate("/users", Some(ClaimsFixtures::scout())).await;

    assert!(outcome.is_denied());
    assert_eq!(
        outcome.location().as_deref(),
        Some(
            "/login?error=AccessDenied&message=Your%20role%20%28Scout%29%20does%20not%20have%20access%20to%20the%20admin%20portal."
        )
    );
}

#[tokio::test]
async fn test_scenario_auth_api_without_session() {
    assert_eq!(evaluate("/api/auth/session", None).await, Outcome::Allow);
}

#[tokio::test]
async fn test_scenario_council_admin_allowed() {
    let outcome = evaluate("/offers", Some(ClaimsFixtures::council_admin())).await;
    assert_eq!(outcome, Outcome::Allow);
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn test_property_auth_api_always_allowed() {
    for path in ["/api/auth", "/api/auth/session", "/api/auth/callback/credentials"] {
        for claims in token_states() {
            assert_eq!(evaluate(path, claims.clone()).await, Outcome::Allow, "{path} {claims:?}");
        }
    }
}

#[tokio::test]
async fn test_property_public_pages_other_than_login_always_allowed() {
    for path in ["/forgot-password", "/reset-password/abc123", "/verify-email?token=x"] {
        for claims in token_states() {
            assert_eq!(evaluate(path, claims.clone()).await, Outcome::Allow, "{path} {claims:?}");
        }
    }
}

#[tokio::test]
async fn test_property_login_redirects_only_permitted_sessions() {
    for claims in ClaimsFixtures::all_roles() {
        let blocked = ["SCOUT", "PARENT"].contains(&claims.role().as_str());
        let outcome = evaluate("/login", Some(claims)).await;

        if blocked {
            // A refused role has to be able to see the denial message.
            assert_eq!(outcome, Outcome::Allow);
        } else {
            assert!(matches!(outcome, Outcome::RedirectAway { .. }));
        }
    }
}

#[tokio::test]
async fn test_property_protected_without_session_keeps_callback() {
    for path in ["/", "/users", "/offers/17/edit", "/settings?tab=security"] {
        let outcome = evaluate(path, None).await;
        let Outcome::RedirectToLogin {
            callback, denial, ..
        } = outcome
        else {
            panic!("expected login redirect for {path}");
        };

        assert_eq!(callback.as_deref(), Some(path));
        assert!(denial.is_none());
    }
}

#[tokio::test]
async fn test_property_protected_by_role() {
    for claims in ClaimsFixtures::all_roles() {
        let blocked = ["SCOUT", "PARENT"].contains(&claims.role().as_str());
        let outcome = evaluate("/merchants", Some(claims)).await;

        assert_eq!(outcome.is_denied(), blocked);
        assert_eq!(outcome.is_allow(), !blocked);
        if let Outcome::RedirectToLogin { callback, .. } = outcome {
            assert!(callback.is_none());
        }
    }
}

#[test]
fn test_property_classify_is_idempotent_and_total() {
    let policy = PolicyFixtures::standard();
    for path in ["", "/", "login", "/login", "/loginx", "/api/authz", "/api/auth/x", "//", "/ü"] {
        let first = policy.classify(path);
        assert_eq!(first, policy.classify(path));
    }

    assert_eq!(policy.classify("/api/auth/signout"), RouteClass::ApiAuth);
    assert_eq!(policy.classify("/reset-password/token"), RouteClass::Public);
    assert_eq!(policy.classify("/troops"), RouteClass::Protected);
}

// =============================================================================
// Verifier Failures
// =============================================================================

#[tokio::test]
async fn test_verifier_expired_session_is_absent() {
    let verifier = StaticVerifier::new().with_token("stale", ClaimsFixtures::expired_admin());
    let evaluation = engine()
        .evaluate(&verifier, "/dashboard", None, &Credentials::from_bearer("stale"))
        .await;

    assert!(evaluation.claims.is_none());
    assert_eq!(
        evaluation.outcome.location().as_deref(),
        Some("/login?callbackUrl=%2Fdashboard")
    );
}

#[tokio::test]
async fn test_verifier_not_called_without_credentials() {
    let verifier = StaticVerifier::new();
    engine()
        .evaluate(&verifier, "/dashboard", None, &Credentials::none())
        .await;
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_verifier_rejecting_everything() {
    let evaluation = engine()
        .evaluate(&RejectingVerifier, "/login", None, &Credentials::from_bearer("x"))
        .await;
    assert_eq!(evaluation.outcome, Outcome::Allow);
    assert_eq!(evaluation.class, RouteClass::Public);
}

// =============================================================================
// Layer
// =============================================================================

#[tokio::test]
async fn test_layer_passes_claims_through() {
    let response = through_layer(
        engine(),
        RequestFixtures::get_with_cookie("/dashboard", "admin"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"hello admin-1");
}

#[tokio::test]
async fn test_layer_bearer_credentials() {
    let response = through_layer(engine(), RequestFixtures::get_with_bearer("/login", "admin")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn test_layer_redirect_keeps_query() {
    let response = through_layer(engine(), RequestFixtures::get("/offers?page=2&sort=new")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        Some("/login?callbackUrl=%2Foffers%3Fpage%3D2%26sort%3Dnew")
    );
}

#[tokio::test]
async fn test_layer_denial_leaves_session_by_default() {
    let response = through_layer(engine(), RequestFixtures::get_with_cookie("/users", "scout")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&response).unwrap().contains("error=AccessDenied"));
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_layer_denial_clears_session_when_configured() {
    let engine = AccessEngine::new(PolicyFixtures::clearing_blocked_sessions());
    let response = through_layer(engine, RequestFixtures::get_with_cookie("/users", "scout")).await;

    let cleared: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_layer_base_path_prefixes_locations() {
    let engine = AccessEngine::new(PolicyFixtures::with_base_path("/admin"));
    let response = through_layer(engine, RequestFixtures::get("/councils")).await;

    assert_eq!(
        location(&response),
        Some("/admin/login?callbackUrl=%2Fadmin%2Fcouncils")
    );
}
