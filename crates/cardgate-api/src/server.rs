// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Portal server.

use std::collections::BTreeSet;
use std::future::Future;
use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use cardgate_core::RouteClass;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::handlers::{self, PORTAL_PAGES, PUBLIC_PAGES};
use crate::middleware::GateLayer;
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The portal server: every route except `/health` sits behind the gate.
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a new server with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let policy = self.state.policy();
        let auth_prefix = policy.routes().api_auth_prefix();

        let gate = GateLayer::new(self.state.engine.clone(), self.state.verifier.clone())
            .with_cookies((*self.state.cookies).clone());

        let mut portal = Router::new()
            .route("/", get(handlers::home))
            .route(&format!("{auth_prefix}/session"), get(handlers::session))
            .route(
                &format!("{auth_prefix}/callback/credentials"),
                post(handlers::sign_in),
            )
            .route(&format!("{auth_prefix}/signout"), post(handlers::sign_out))
            .route(policy.login_path(), get(handlers::login_page));

        let mut pages: BTreeSet<&str> = PUBLIC_PAGES.iter().chain(PORTAL_PAGES).copied().collect();
        pages.insert(policy.dashboard_path());
        pages.remove(policy.login_path());
        pages.remove("/");
        for page in pages {
            portal = match policy.classify(page) {
                RouteClass::Protected => portal.route(page, get(handlers::portal_page)),
                _ => portal.route(page, get(handlers::public_page)),
            };
        }

        let portal = portal
            .fallback(handlers::not_found)
            .layer(gate)
            .route("/health", get(handlers::health));

        let app = if self.state.config.base_path.is_empty() {
            portal
        } else {
            Router::new().nest(&self.state.config.base_path, portal)
        };

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    self.state.config.request_timeout,
                )),
        )
        .with_state(self.state.clone())
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let router = self.router();
        let local = listener.local_addr()?;

        info!(
            addr = %local,
            base_path = %self.state.config.base_path,
            blocked_roles = ?self.state.policy().blocked_roles(),
            "Portal gate listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("Portal server shutdown complete");
        Ok(())
    }

    /// Returns the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }
}

// =============================================================================
// Tests
// =============================================================================
