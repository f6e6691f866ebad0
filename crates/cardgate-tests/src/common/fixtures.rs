// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built policies, sessions, users and config files. The users mirror
//! the portal's seeded development accounts.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request},
};
use cardgate_api::{
    ApiConfig, AppState, JwtConfig, JwtIssuer, PortalUser, SessionCookies, UserDirectory,
};
use cardgate_core::{Claims, GatePolicy, Role};

/// Secret shared by every fixture that signs or verifies tokens.
pub const TEST_SECRET: &str = "cardgate-test-secret-that-is-long-enough";

/// Plain cookie name used by fixtures.
pub const SESSION_COOKIE: &str = "next-auth.session-token";

// =============================================================================
// Policy Fixtures
// =============================================================================

/// Gate policies.
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// The portal's stock policy.
    pub fn standard() -> GatePolicy {
        GatePolicy::default()
    }

    /// Stock policy served under `base_path`.
    pub fn with_base_path(base_path: &str) -> GatePolicy {
        GatePolicy::builder()
            .base_path(base_path)
            .build()
            .expect("valid base path policy")
    }

    /// Stock policy that expires the session of a refused role.
    pub fn clearing_blocked_sessions() -> GatePolicy {
        GatePolicy::builder()
            .clear_blocked_session(true)
            .build()
            .expect("valid clearing policy")
    }
}

// =============================================================================
// Claims Fixtures
// =============================================================================

/// Sessions for each portal role.
pub struct ClaimsFixtures;

impl ClaimsFixtures {
    /// A session with the given role.
    pub fn with_role(user_id: &str, role: &str) -> Claims {
        Claims::builder(user_id)
            .role(role)
            .email(format!("{user_id}@campcard.test"))
            .expires_in(3600)
            .build()
    }

    /// National admin.
    pub fn admin() -> Claims {
        Self::with_role("admin-1", Role::ADMIN)
    }

    /// Council admin.
    pub fn council_admin() -> Claims {
        Claims::builder("council-admin-1")
            .role(Role::COUNCIL_ADMIN)
            .name("Casey Council")
            .council_id("council-42")
            .expires_in(3600)
            .build()
    }

    /// Troop leader.
    pub fn troop_leader() -> Claims {
        Self::with_role("leader-1", Role::TROOP_LEADER)
    }

    /// Scout: blocked by default.
    pub fn scout() -> Claims {
        Self::with_role("scout-1", Role::SCOUT)
    }

    /// Parent: blocked by default.
    pub fn parent() -> Claims {
        Self::with_role("parent-1", Role::PARENT)
    }

    /// One session per well-known role.
    pub fn all_roles() -> Vec<Claims> {
        vec![
            Self::admin(),
            Self::with_role("super-1", Role::SUPER_ADMIN),
            Self::council_admin(),
            Self::troop_leader(),
            Self::scout(),
            Self::parent(),
        ]
    }

    /// A session that expired an hour ago.
    pub fn expired_admin() -> Claims {
        Claims::builder("admin-1")
            .role(Role::ADMIN)
            .expires_in(-3600)
            .build()
    }
}

// =============================================================================
// Portal Fixtures
// =============================================================================

/// Sign-in users and server state.
pub struct PortalFixtures;

impl PortalFixtures {
    /// Password of every fixture user.
    pub const PASSWORD: &'static str = "password123";

    /// JWT settings signed with [`TEST_SECRET`].
    pub fn jwt() -> JwtConfig {
        JwtConfig::new(TEST_SECRET)
    }

    /// Issuer matching [`PortalFixtures::jwt`].
    pub fn issuer() -> JwtIssuer {
        JwtIssuer::new(Self::jwt()).expect("valid test jwt config")
    }

    /// Signs `claims` with the test secret.
    pub fn token_for(claims: &Claims) -> String {
        Self::issuer().issue(claims).expect("token issued")
    }

    /// Seeded development accounts.
    pub fn users() -> UserDirectory {
        UserDirectory::new(vec![
            PortalUser::new("admin-1", "admin@campcard.org", Self::PASSWORD, Role::ADMIN)
                .with_name("Alex Admin"),
            PortalUser::new(
                "council-admin-1",
                "council@campcard.org",
                Self::PASSWORD,
                Role::COUNCIL_ADMIN,
            )
            .with_name("Casey Council")
            .with_council("council-42"),
            PortalUser::new("scout-1", "scout@campcard.org", Self::PASSWORD, Role::SCOUT)
                .with_name("Sam Scout"),
        ])
    }

    /// Full server state for `policy`, with the base path taken from it.
    pub fn state(policy: GatePolicy) -> AppState {
        let config = ApiConfig::new().with_base_path(policy.base_path());

        AppState::builder()
            .config(config)
            .policy(policy)
            .jwt(Self::jwt())
            .cookies(SessionCookies::default())
            .users(Self::users())
            .build()
            .expect("valid test state")
    }

    /// State whose gate trusts `verifier` instead of JWTs.
    pub fn state_with_verifier(
        policy: GatePolicy,
        verifier: Arc<dyn cardgate_core::TokenVerifier>,
    ) -> AppState {
        AppState::builder()
            .config(ApiConfig::new().with_base_path(policy.base_path()))
            .policy(policy)
            .verifier(verifier)
            .build()
            .expect("valid test state")
    }
}

// =============================================================================
// Request Fixtures
// =============================================================================

/// HTTP requests.
pub struct RequestFixtures;

impl RequestFixtures {
    /// Anonymous `GET`.
    pub fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    /// `GET` carrying `token` in the session cookie.
    pub fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, format!("theme=dark; {SESSION_COOKIE}={token}"))
            .body(Body::empty())
            .expect("valid request")
    }

    /// `GET` carrying `token` as a bearer credential.
    pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("valid request")
    }

    /// JSON `POST`.
    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Config file contents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A complete YAML config.
    pub fn yaml() -> String {
        format!(
            r#"
server:
  host: 127.0.0.1
  port: 3100
  base_path: ""
  request_timeout_secs: 15

auth:
  secret: "{TEST_SECRET}"
  algorithm: HS256
  leeway_secs: 30
  users:
    - id: admin-1
      email: admin@campcard.org
      password: password123
      role: ADMIN
      name: Alex Admin
    - id: scout-1
      email: scout@campcard.org
      password: password123
      role: SCOUT

gate:
  login_path: /login
  dashboard_path: /dashboard
  blocked_roles: [SCOUT, PARENT]

logging:
  level: debug
  format: json
"#
        )
    }

    /// The same settings as TOML.
    pub fn toml() -> String {
        format!(
            r#"
[server]
port = 3100

[auth]
secret = "{TEST_SECRET}"

[[auth.users]]
id = "admin-1"
email = "admin@campcard.org"
password = "password123"
role = "ADMIN"

[gate]
blocked_roles = ["SCOUT", "PARENT", "TROOP_LEADER"]
"#
        )
    }

    /// Minimal JSON config.
    pub fn json() -> String {
        serde_json::json!({
            "server": { "port": 3100 },
            "auth": { "secret": TEST_SECRET },
            "gate": { "clear_blocked_session": true }
        })
        .to_string()
    }
}
