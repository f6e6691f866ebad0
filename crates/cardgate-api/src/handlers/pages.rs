// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Placeholder portal pages.
//!
//! The real pages are rendered by the front end. These stand-ins let the gate
//! be exercised end to end and show who it let through.

use axum::{
    extract::{Query, State},
    http::Uri,
    response::{Html, Redirect},
};
use cardgate_core::GatePolicy;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extractors::Session;
use crate::state::AppState;

/// Pages reachable without a session.
pub const PUBLIC_PAGES: &[&str] = &["/forgot-password", "/reset-password", "/verify-email"];

/// Pages behind the gate.
pub const PORTAL_PAGES: &[&str] = &[
    "/dashboard",
    "/users",
    "/offers",
    "/merchants",
    "/councils",
    "/troops",
    "/scouts",
    "/settings",
];

/// Query parameters the gate puts on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    /// Where to return after signing in.
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
    /// Error code, e.g. `AccessDenied`.
    pub error: Option<String>,
    /// Human-readable error.
    pub message: Option<String>,
}

/// GET /
///
/// Sends signed-in callers to the dashboard.
pub async fn home(State(state): State<AppState>) -> Redirect {
    let policy = state.policy();
    Redirect::temporary(&policy.url_for(policy.dashboard_path()))
}

/// GET /login
pub async fn login_page(Query(params): Query<LoginParams>) -> Html<String> {
    let mut body = String::from("<h1>Sign in</h1>");

    if let Some(ref error) = params.error {
        body.push_str(&format!(
            "<p class=\"error\" data-error=\"{}\">{}</p>",
            escape(error),
            escape(params.message.as_deref().unwrap_or(error))
        ));
    }
    if let Some(ref callback) = params.callback_url {
        body.push_str(&format!(
            "<p>You will return to <code>{}</code>.</p>",
            escape(callback)
        ));
    }

    Html(layout("Sign in", &body))
}

/// A page behind the gate, titled after its path.
///
/// The gate only lets signed-in, permitted callers this far.
pub async fn portal_page(
    State(state): State<AppState>,
    uri: Uri,
    Session(claims): Session,
) -> Html<String> {
    let title = title_for(uri.path());
    let who = claims.name.as_deref().unwrap_or(claims.user_id());

    let policy = state.policy();
    let body = format!(
        "<h1>{}</h1><p>Signed in as {} ({}).</p>\
         <form method=\"post\" action=\"{}\"><button>Sign out</button></form>",
        escape(&title),
        escape(who),
        escape(&claims.role().display_name()),
        escape(&signout_url(policy))
    );

    Html(layout(&title, &body))
}

/// A page reachable without a session.
pub async fn public_page(uri: Uri) -> Html<String> {
    let title = title_for(uri.path());
    Html(layout(&title, &format!("<h1>{}</h1>", escape(&title))))
}

/// Fallback for unknown paths. Still gated, so only signed-in callers see it.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Page '{}'", uri.path()))
}

/// Sign-out endpoint under the credentials provider's prefix.
fn signout_url(policy: &GatePolicy) -> String {
    policy.url_for(&format!("{}/signout", policy.routes().api_auth_prefix()))
}

/// `/forgot-password` becomes `Forgot Password`.
fn title_for(path: &str) -> String {
    let segment = path.trim_matches('/').rsplit('/').next().unwrap_or_default();
    if segment.is_empty() {
        return "Camp Card".to_string();
    }

    segment
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{} | Camp Card Admin</title></head><body>{}</body></html>",
        escape(title),
        body
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
