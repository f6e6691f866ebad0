// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cardgate-api
//!
//! HTTP adapter for the cardgate access gate.
//!
//! This crate puts the [`cardgate_core::AccessEngine`] in front of an axum
//! router as a tower layer, verifies session tokens as HS-signed JWTs read
//! from the session cookies, and serves the credentials sign-in endpoints
//! and placeholder portal pages around it.
//!
//! ```rust,ignore
//! let state = AppState::builder()
//!     .policy(GatePolicy::default())
//!     .jwt(JwtConfig::new(secret))
//!     .build()?;
//! let listener = TcpListener::bind("0.0.0.0:3000").await?;
//! ApiServer::new(state).serve(listener, shutdown).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{JwtConfig, JwtIssuer, JwtVerifier, PortalUser, SessionCookies, UserDirectory};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use extractors::{OptionalSession, Session};
pub use middleware::{redirect_response, GateLayer, GateMiddleware};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
