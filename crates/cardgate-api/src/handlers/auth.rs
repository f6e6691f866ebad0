// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credentials provider endpoints under `/api/auth`.
//!
//! The gate always lets these through; they read the session themselves.

use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{OptionalSession, ValidatedJson};
use crate::response::SessionResponse;
use crate::state::AppState;

// =============================================================================
// Session
// =============================================================================

/// GET /api/auth/session
///
/// Returns the current session, or `{}` when there is none.
pub async fn session(OptionalSession(claims): OptionalSession) -> Response {
    match claims {
        Some(claims) => Json(SessionResponse::from(&claims)).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}

// =============================================================================
// Sign In
// =============================================================================

/// Credentials sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Where to go after signing in.
    #[serde(default, rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Credentials sign-in response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    /// Where the client should navigate next.
    pub url: String,
    /// The new session.
    pub session: SessionResponse,
}

/// POST /api/auth/callback/credentials
///
/// Checks the credentials against the configured users and sets the session
/// cookie.
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let issuer = state
        .issuer()
        .ok_or_else(|| ApiError::service_unavailable("Sign-in is not configured"))?;

    let Some(user) = state.users.authenticate(&request.email, &request.password) else {
        tracing::warn!(email = %request.email, "Sign-in failed");
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let claims = user.claims(issuer.expiration_secs());
    let token = issuer.issue(&claims)?;
    let cookie = state
        .cookies
        .issue(&token)
        .ok_or_else(|| ApiError::internal("no session cookie name usable without Secure"))?;

    let policy = state.policy();
    let url = request
        .callback_url
        .filter(|url| is_local_path(url))
        .unwrap_or_else(|| policy.url_for(policy.dashboard_path()));

    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(SignInResponse {
            url,
            session: SessionResponse::from(&claims),
        }),
    ))
}

// =============================================================================
// Sign Out
// =============================================================================

/// POST /api/auth/signout
///
/// Expires every session cookie.
pub async fn sign_out(
    State(state): State<AppState>,
    OptionalSession(claims): OptionalSession,
) -> impl IntoResponse {
    if let Some(claims) = claims {
        tracing::info!(user_id = %claims.user_id(), "User signed out");
    }

    let policy = state.policy();
    let cookies = state
        .cookies
        .expire_all()
        .into_iter()
        .map(|cookie| (header::SET_COOKIE, cookie));

    (
        AppendHeaders(cookies),
        Json(serde_json::json!({ "url": policy.url_for(policy.login_path()) })),
    )
}

/// Accepts only same-origin paths as a post sign-in destination.
///
/// Browsers drop tabs and newlines while parsing a URL, so any control or
/// whitespace character could hide a `//host` prefix.
fn is_local_path(url: &str) -> bool {
    url.starts_with('/')
        && !url.starts_with("//")
        && !url
            .chars()
            .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
}
