// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for portal handlers.

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use cardgate_core::Claims;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

// =============================================================================
// Session Extractor
// =============================================================================

/// The verified session of the current request.
///
/// The gate stores [`Claims`] in the request extensions when it lets a
/// request through. Returns 401 if there are none, which only happens on
/// routes the gate treats as public.
///
/// ```rust,ignore
/// async fn handler(Session(claims): Session) -> String {
///     format!("Hello, {}", claims.user_id())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Session(pub Claims);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Session)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// =============================================================================
// Optional Session Extractor
// =============================================================================

/// The verified session, if the request has one.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(parts.extensions.get::<Claims>().cloned()))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON body extractor that rejects with an [`ApiError`].
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use cardgate_core::Role;

    #[tokio::test]
    async fn test_session_from_extensions() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/dashboard")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        assert!(Session::from_request_parts(&mut parts, &()).await.is_err());
        let OptionalSession(none) = OptionalSession::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(none.is_none());

        parts
            .extensions
            .insert(Claims::new("u-1", Role::new(Role::ADMIN), 60));
        let Session(claims) = Session::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(claims.user_id(), "u-1");
    }

    #[tokio::test]
    async fn test_validated_json_rejects_garbage() {
        let req = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let result = ValidatedJson::<serde_json::Value>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError::BadRequest { .. })));
    }
}
