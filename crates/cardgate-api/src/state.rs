// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Instant;

use cardgate_core::{AccessEngine, GatePolicy, TokenVerifier};

use crate::auth::{JwtConfig, JwtIssuer, JwtVerifier, SessionCookies, UserDirectory};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers and the gate.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ApiConfig>,
    /// Access decision engine.
    pub engine: AccessEngine,
    /// Session verifier used by the gate.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Session issuer used by sign-in; sign-in is disabled without one.
    pub issuer: Option<Arc<JwtIssuer>>,
    /// Session cookie settings.
    pub cookies: Arc<SessionCookies>,
    /// Users accepted by sign-in.
    pub users: Arc<UserDirectory>,
    /// When the state was built.
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the gate policy.
    pub fn policy(&self) -> &GatePolicy {
        self.engine.policy()
    }

    /// Returns the issuer, if sign-in is enabled.
    pub fn issuer(&self) -> Option<&JwtIssuer> {
        self.issuer.as_deref()
    }

    /// Seconds since the state was built.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("policy", self.engine.policy())
            .field("sign_in", &self.issuer.is_some())
            .field("users", &self.users.len())
            .finish()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    policy: Option<GatePolicy>,
    jwt: Option<JwtConfig>,
    verifier: Option<Arc<dyn TokenVerifier>>,
    issuer: Option<Arc<JwtIssuer>>,
    cookies: Option<SessionCookies>,
    users: Option<UserDirectory>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the gate policy.
    pub fn policy(mut self, policy: GatePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the session token settings.
    ///
    /// Builds a [`JwtVerifier`] and [`JwtIssuer`] unless they were set
    /// explicitly.
    pub fn jwt(mut self, jwt: JwtConfig) -> Self {
        self.jwt = Some(jwt);
        self
    }

    /// Sets the session verifier.
    pub fn verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Sets the session issuer.
    pub fn issuer(mut self, issuer: Arc<JwtIssuer>) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Sets the session cookie settings.
    pub fn cookies(mut self, cookies: SessionCookies) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// Sets the sign-in users.
    pub fn users(mut self, users: UserDirectory) -> Self {
        self.users = Some(users);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails when neither a verifier nor JWT settings were given.
    pub fn build(self) -> ApiResult<AppState> {
        let verifier: Arc<dyn TokenVerifier> = match (self.verifier, &self.jwt) {
            (Some(verifier), _) => verifier,
            (None, Some(jwt)) => Arc::new(JwtVerifier::new(jwt)?),
            (None, None) => return Err(ApiError::internal("no session verifier configured")),
        };

        let issuer = match (self.issuer, self.jwt) {
            (Some(issuer), _) => Some(issuer),
            (None, Some(jwt)) => Some(Arc::new(JwtIssuer::new(jwt)?)),
            (None, None) => None,
        };

        Ok(AppState {
            config: Arc::new(self.config.unwrap_or_default()),
            engine: AccessEngine::new(self.policy.unwrap_or_default()),
            verifier,
            issuer,
            cookies: Arc::new(self.cookies.unwrap_or_default()),
            users: Arc::new(self.users.unwrap_or_default()),
            started_at: Instant::now(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
