// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Portal runtime orchestration.
//!
//! Turns a [`CardgateConfig`] into the pieces `cardgate-api` needs (gate
//! policy, JWT settings, cookies, sign-in users), serves the router and
//! waits for a shutdown signal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use cardgate_api::{
    auth::Algorithm, ApiConfig, ApiServer, AppState, JwtConfig, PortalUser, SessionCookies,
    UserDirectory,
};
use cardgate_config::{
    load_config, AuthConfig, CardgateConfig, ConfigLoader, JwtAlgorithm, ServerConfig,
};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// PortalRuntime
// =============================================================================

/// Serves the portal behind the gate until shutdown is signaled.
pub struct PortalRuntime {
    config: Arc<CardgateConfig>,
    shutdown: ShutdownCoordinator,
}

impl PortalRuntime {
    /// Creates a new runtime.
    pub fn new(config: CardgateConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Runs the portal until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting cardgate v{}", cardgate_core::VERSION);

        let state = build_state(&self.config)?;
        if state.users.is_empty() {
            warn!("No users configured; credentials sign-in will reject everyone");
        }

        let server = ApiServer::new(state);
        let addr = server.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| BinError::init(format!("failed to bind {addr}: {e}")))?;

        tokio::spawn(self.shutdown.clone().listen_for_signals());

        server
            .serve(listener, self.shutdown.shutdown_signal())
            .await
            .map_err(|e| BinError::from(e).with_context("portal server"))?;

        info!("cardgate shutdown complete");
        Ok(())
    }
}

// =============================================================================
// Config Mapping
// =============================================================================

/// Builds the server state described by `config`.
pub fn build_state(config: &CardgateConfig) -> BinResult<AppState> {
    let policy = config.policy()?;
    let jwt = jwt_config(&config.auth)?;

    let state = AppState::builder()
        .config(api_config(&config.server))
        .policy(policy)
        .jwt(jwt)
        .cookies(session_cookies(&config.auth))
        .users(user_directory(&config.auth))
        .build()?;

    debug!(state = ?state, "Portal state ready");
    Ok(state)
}

/// JWT settings from the `auth` section. Fails without a secret.
pub fn jwt_config(auth: &AuthConfig) -> BinResult<JwtConfig> {
    let secret = auth
        .secret()
        .ok_or_else(|| BinError::config("auth.secret is not set (or export NEXTAUTH_SECRET)"))?;

    let mut jwt = JwtConfig::new(secret)
        .with_algorithm(algorithm(auth.algorithm))
        .with_leeway(auth.leeway_secs)
        .with_expiration(auth.session_max_age_secs);
    if let Some(ref issuer) = auth.issuer {
        jwt = jwt.with_issuer(issuer);
    }

    jwt.validate()?;
    Ok(jwt)
}

fn algorithm(algorithm: JwtAlgorithm) -> Algorithm {
    match algorithm {
        JwtAlgorithm::HS256 => Algorithm::HS256,
        JwtAlgorithm::HS384 => Algorithm::HS384,
        JwtAlgorithm::HS512 => Algorithm::HS512,
    }
}

fn api_config(server: &ServerConfig) -> ApiConfig {
    ApiConfig::new()
        .with_host(server.host)
        .with_port(server.port)
        .with_base_path(&server.base_path)
        .with_request_timeout(Duration::from_secs(server.request_timeout_secs))
}

fn session_cookies(auth: &AuthConfig) -> SessionCookies {
    SessionCookies::new(auth.cookie_names.iter().filter(|name| !name.trim().is_empty()))
        .with_max_age(auth.session_max_age_secs)
        .with_secure(auth.secure_cookies)
}

fn user_directory(auth: &AuthConfig) -> UserDirectory {
    let users = auth
        .users
        .iter()
        .map(|user| {
            let mut portal_user = PortalUser::new(
                &user.id,
                &user.email,
                user.password.expose(),
                user.role.as_str(),
            );
            if let Some(ref name) = user.name {
                portal_user = portal_user.with_name(name);
            }
            if let Some(ref council_id) = user.council_id {
                portal_user = portal_user.with_council(council_id);
            }
            portal_user
        })
        .collect();

    UserDirectory::new(users)
}

/// Loads `path` without validation, or the defaults when it does not exist.
///
/// For commands that only need part of the configuration.
pub fn load_lenient(path: &Path) -> BinResult<CardgateConfig> {
    let loader = ConfigLoader::new().with_validation(false);

    if path.exists() {
        Ok(loader.load(path)?)
    } else {
        debug!(path = %path.display(), "Config file not found, using defaults");
        Ok(loader.load_defaults()?)
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the portal runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<CardgateConfig>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: CardgateConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<PortalRuntime> {
        let config = match self.config {
            Some(config) => config,
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::config("No configuration provided"))?;

                load_config(&path).map_err(|e| {
                    BinError::from(e).with_context(format!("loading {}", path.display()))
                })?
            }
        };

        Ok(PortalRuntime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================
