// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access decision engine.
//!
//! Rules, first match wins:
//!
//! | route       | session                      | outcome                              |
//! |-------------|------------------------------|--------------------------------------|
//! | `ApiAuth`   | any                          | `Allow`                              |
//! | `Public`    | permitted role, login page   | `RedirectAway` to the dashboard      |
//! | `Public`    | anything else                | `Allow`                              |
//! | `Protected` | none                         | `RedirectToLogin` with `callbackUrl` |
//! | `Protected` | blocked role                 | `RedirectToLogin` with `AccessDenied`|
//! | `Protected` | permitted role               | `Allow`                              |
//!
//! A blocked session on the login page is allowed through, so that the
//! denial redirect lands on a page that can be rendered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::claims::Claims;
use crate::policy::GatePolicy;
use crate::route::{Route, RouteClass};
use crate::verifier::{Credentials, TokenVerifier};

/// Value of the `error` query parameter on role denials.
pub const ACCESS_DENIED: &str = "AccessDenied";

// =============================================================================
// Outcome
// =============================================================================

/// Why a signed-in caller was sent back to login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    /// Machine-readable reason, sent as `error`.
    pub error: String,
    /// Human-readable explanation, sent as `message`.
    pub message: String,
}

/// Result of gating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Pass the request to the next handler.
    Allow,
    /// The caller is already signed in; send them to `target` instead.
    RedirectAway {
        /// Where to send the caller.
        target: String,
    },
    /// Send the caller to the login page.
    RedirectToLogin {
        /// Login page URL.
        login: String,
        /// Originally requested target, for return navigation.
        #[serde(skip_serializing_if = "Option::is_none")]
        callback: Option<String>,
        /// Present when a valid session was refused because of its role.
        #[serde(skip_serializing_if = "Option::is_none")]
        denial: Option<Denial>,
    },
}

impl Outcome {
    /// Returns `true` for [`Outcome::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, Outcome::Allow)
    }

    /// Returns `true` if the outcome refuses a signed-in caller.
    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::RedirectToLogin { denial: Some(_), .. })
    }

    /// Short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Allow => "allow",
            Outcome::RedirectAway { .. } => "redirect_away",
            Outcome::RedirectToLogin { denial: None, .. } => "redirect_to_login",
            Outcome::RedirectToLogin { denial: Some(_), .. } => "access_denied",
        }
    }

    /// Returns the redirect location, with query values percent-encoded.
    pub fn location(&self) -> Option<String> {
        match self {
            Outcome::Allow => None,
            Outcome::RedirectAway { target } => Some(target.clone()),
            Outcome::RedirectToLogin {
                login,
                callback,
                denial,
            } => {
                let mut params = Vec::new();
                if let Some(callback) = callback {
                    params.push(format!("callbackUrl={}", urlencoding::encode(callback)));
                }
                if let Some(denial) = denial {
                    params.push(format!("error={}", urlencoding::encode(&denial.error)));
                    params.push(format!("message={}", urlencoding::encode(&denial.message)));
                }

                if params.is_empty() {
                    Some(login.clone())
                } else {
                    Some(format!("{}?{}", login, params.join("&")))
                }
            }
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Full result of [`AccessEngine::evaluate`].
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Classification of the request path.
    pub class: RouteClass,
    /// Verified session, if any.
    pub claims: Option<Claims>,
    /// The decision.
    pub outcome: Outcome,
}

// =============================================================================
// AccessEngine
// =============================================================================

/// The access decision engine.
///
/// Holds a shared, immutable [`GatePolicy`]; cloning is cheap.
#[derive(Debug, Clone)]
pub struct AccessEngine {
    policy: Arc<GatePolicy>,
}

impl AccessEngine {
    /// Creates an engine for the given policy.
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Returns the policy.
    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    /// Classifies a request target.
    pub fn route<'a>(&self, path: &'a str, query: Option<&'a str>) -> Route<'a> {
        Route {
            path,
            query,
            class: self.policy.classify(path),
        }
    }

    /// Decides what to do with a classified request.
    pub fn decide(&self, route: &Route<'_>, claims: Option<&Claims>) -> Outcome {
        let policy = &*self.policy;

        match route.class {
            RouteClass::ApiAuth => Outcome::Allow,
            RouteClass::Public => match claims {
                Some(claims)
                    if policy.is_login_path(route.path) && !policy.is_blocked(claims.role()) =>
                {
                    Outcome::RedirectAway {
                        target: policy.url_for(policy.dashboard_path()),
                    }
                }
                _ => Outcome::Allow,
            },
            RouteClass::Protected => match claims {
                None => Outcome::RedirectToLogin {
                    login: policy.url_for(policy.login_path()),
                    callback: Some(policy.url_for(&route.target())),
                    denial: None,
                },
                Some(claims) if policy.is_blocked(claims.role()) => Outcome::RedirectToLogin {
                    login: policy.url_for(policy.login_path()),
                    callback: None,
                    denial: Some(Denial {
                        error: ACCESS_DENIED.to_string(),
                        message: policy.denial_message(claims.role()),
                    }),
                },
                Some(_) => Outcome::Allow,
            },
        }
    }

    /// Classifies and decides in one step.
    pub fn decide_path(&self, path: &str, query: Option<&str>, claims: Option<&Claims>) -> Outcome {
        let route = self.route(path, query);
        self.decide(&route, claims)
    }

    /// Verifies the request's credentials and decides.
    ///
    /// This is the only await point of the gate: the verifier runs first, then
    /// the pure decision.
    pub async fn evaluate<V>(
        &self,
        verifier: &V,
        path: &str,
        query: Option<&str>,
        credentials: &Credentials,
    ) -> Evaluation
    where
        V: TokenVerifier + ?Sized,
    {
        let route = self.route(path, query);

        let claims = if credentials.is_empty() {
            None
        } else {
            verifier.verify(credentials).await
        };

        let outcome = self.decide(&route, claims.as_ref());

        match &outcome {
            Outcome::Allow => {
                debug!(path = %path, class = %route.class, "Request allowed");
            }
            Outcome::RedirectAway { target } => {
                info!(path = %path, target = %target, "Signed-in user redirected away from login");
            }
            Outcome::RedirectToLogin { denial: None, .. } => {
                info!(path = %path, "No valid session, redirecting to login");
            }
            Outcome::RedirectToLogin { denial: Some(_), .. } => {
                warn!(
                    path = %path,
                    user_id = claims.as_ref().map(|c| c.user_id()).unwrap_or_default(),
                    role = claims.as_ref().map(|c| c.role().as_str()).unwrap_or_default(),
                    "Role blocked from admin portal"
                );
            }
        }

        Evaluation {
            class: route.class,
            claims,
            outcome,
        }
    }
}

impl Default for AccessEngine {
    fn default() -> Self {
        Self::new(GatePolicy::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
