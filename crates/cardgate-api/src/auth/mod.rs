// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session handling for the portal.
//!
//! This module provides:
//! - Session cookie parsing, issuing and expiry
//! - JWT verification behind the gate's `TokenVerifier` seam
//! - The credentials user directory used by sign-in

mod cookies;
mod jwt;
mod users;

pub use cookies::{SessionCookies, DEFAULT_COOKIE_NAMES, SECURE_PREFIX};
pub use jsonwebtoken::Algorithm;
pub use jwt::{JwtConfig, JwtIssuer, JwtVerifier, MIN_SECRET_LEN};
pub use users::{PortalUser, UserDirectory};
