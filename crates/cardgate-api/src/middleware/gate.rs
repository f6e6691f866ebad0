// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route-access gate middleware.
//!
//! Every request is classified, its session verified, and the access engine's
//! outcome applied: `Allow` passes through with the verified [`Claims`] in the
//! request extensions; every other outcome becomes a `307` redirect.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use cardgate_core::{AccessEngine, Claims, Outcome, TokenVerifier};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::SessionCookies;
use crate::error::ApiError;

// =============================================================================
// GateLayer
// =============================================================================

/// Layer that puts the access gate in front of a service.
#[derive(Clone)]
pub struct GateLayer {
    engine: AccessEngine,
    verifier: Arc<dyn TokenVerifier>,
    cookies: Arc<SessionCookies>,
}

impl GateLayer {
    /// Creates a gate layer.
    pub fn new(engine: AccessEngine, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            engine,
            verifier,
            cookies: Arc::new(SessionCookies::default()),
        }
    }

    /// Sets the session cookies to read (and to clear on denial).
    pub fn with_cookies(mut self, cookies: SessionCookies) -> Self {
        self.cookies = Arc::new(cookies);
        self
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateMiddleware {
            inner,
            engine: self.engine.clone(),
            verifier: self.verifier.clone(),
            cookies: self.cookies.clone(),
        }
    }
}

// =============================================================================
// GateMiddleware
// =============================================================================

/// Middleware applying the access engine to each request.
#[derive(Clone)]
pub struct GateMiddleware<S> {
    inner: S,
    engine: AccessEngine,
    verifier: Arc<dyn TokenVerifier>,
    cookies: Arc<SessionCookies>,
}

impl<S> Service<Request<Body>> for GateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let engine = self.engine.clone();
        let verifier = self.verifier.clone();
        let cookies = self.cookies.clone();
        let mut inner = self.inner.clone();

        let span = tracing::debug_span!("gate", request_id = %Uuid::now_v7());

        Box::pin(
            async move {
                let credentials = cookies.extract(req.headers());
                let path = req.uri().path().to_string();
                let query = req.uri().query().map(str::to_string);

                let evaluation = engine
                    .evaluate(verifier.as_ref(), &path, query.as_deref(), &credentials)
                    .await;

                match evaluation.outcome {
                    Outcome::Allow => {
                        if let Some(claims) = evaluation.claims {
                            req.extensions_mut().insert::<Claims>(claims);
                        }
                        inner.call(req).await
                    }
                    outcome => {
                        let clear = outcome.is_denied() && engine.policy().clear_blocked_session();
                        Ok(redirect_response(&outcome, clear.then(|| cookies.expire_all())))
                    }
                }
            }
            .instrument(span),
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Renders a redirect outcome as a `307` response.
///
/// `set_cookies`, when present, are attached as `Set-Cookie` headers.
pub fn redirect_response(outcome: &Outcome, set_cookies: Option<Vec<String>>) -> Response {
    let Some(location) = outcome.location() else {
        return ApiError::internal("redirect requested without a location").into_response();
    };

    let location = match HeaderValue::from_str(&location) {
        Ok(value) => value,
        Err(e) => {
            return ApiError::internal(format!("invalid redirect location '{}': {}", location, e))
                .into_response();
        }
    };

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
    response.headers_mut().insert(header::LOCATION, location);

    for cookie in set_cookies.into_iter().flatten() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Skipping invalid Set-Cookie value"),
        }
    }

    response
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cardgate_core::{Credentials, GatePolicy, Role};
    use std::convert::Infallible;
    use tower::ServiceExt;

    /// Treats the token text as the role.
    struct RoleTokenVerifier;

    #[async_trait]
    impl TokenVerifier for RoleTokenVerifier {
        async fn verify(&self, credentials: &Credentials) -> Option<Claims> {
            let role = credentials.token()?;
            (role != "garbage").then(|| Claims::new("u-1", Role::new(role), 3600))
        }
    }

    async fn send(policy: GatePolicy, req: Request<Body>) -> Response {
        let service = tower::service_fn(|req: Request<Body>| async move {
            let who = req
                .extensions()
                .get::<Claims>()
                .map(|c| c.role().to_string())
                .unwrap_or_else(|| "anonymous".to_string());
            Ok::<_, Infallible>(Response::new(Body::from(who)))
        });

        GateLayer::new(AccessEngine::new(policy), Arc::new(RoleTokenVerifier))
            .layer(service)
            .oneshot(req)
            .await
            .unwrap()
    }

    fn request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("next-auth.session-token={}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_protected_without_session() {
        let response = send(GatePolicy::default(), request("/dashboard", None)).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login?callbackUrl=%2Fdashboard");
    }

    #[tokio::test]
    async fn test_invalid_token_is_absent() {
        let response = send(GatePolicy::default(), request("/users?page=2", Some("garbage"))).await;

        assert_eq!(location(&response), "/login?callbackUrl=%2Fusers%3Fpage%3D2");
    }

    #[tokio::test]
    async fn test_allowed_request_carries_claims() {
        let response = send(GatePolicy::default(), request("/offers", Some("COUNCIL_ADMIN"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"COUNCIL_ADMIN");
    }

    #[tokio::test]
    async fn test_login_with_session_redirects_away() {
        let response = send(GatePolicy::default(), request("/login", Some("ADMIN"))).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_blocked_role_keeps_session_by_default() {
        let response = send(GatePolicy::default(), request("/users", Some("SCOUT"))).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(location(&response).starts_with("/login?error=AccessDenied&message="));
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_blocked_role_clears_session_when_enabled() {
        let policy = GatePolicy::builder()
            .clear_blocked_session(true)
            .build()
            .unwrap();
        let response = send(policy, request("/users", Some("PARENT"))).await;

        let cleared: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cleared.len(), 2);
    }

    #[tokio::test]
    async fn test_api_auth_passes_through() {
        let response = send(GatePolicy::default(), request("/api/auth/session", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_redirect_response_for_allow() {
        let response = redirect_response(&Outcome::Allow, None);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
