// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cardgate-core
//!
//! Framework-agnostic access gate for the Camp Card admin portal.
//!
//! This crate holds everything the gate decides without touching HTTP:
//!
//! - **Role**: Normalised role tags (`ADMIN`, `COUNCIL_ADMIN`, `SCOUT`, ...)
//! - **Claims**: The verified session payload
//! - **Route**: Classification of a path as public, auth-callback, or protected
//! - **Policy**: The immutable allow-list and blocked-role set
//! - **Decision**: The access decision engine and its outcomes
//! - **Verifier**: The `TokenVerifier` seam to the credentials provider
//!
//! ## Example
//!
//! ```
//! use cardgate_core::{AccessEngine, Claims, GatePolicy, Outcome, Role};
//!
//! let engine = AccessEngine::new(GatePolicy::default());
//!
//! let outcome = engine.decide_path("/dashboard", None, None);
//! assert_eq!(outcome.location().as_deref(), Some("/login?callbackUrl=%2Fdashboard"));
//!
//! let admin = Claims::new("u-1", Role::new("COUNCIL_ADMIN"), 3600);
//! assert_eq!(engine.decide_path("/offers", None, Some(&admin)), Outcome::Allow);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod claims;
pub mod decision;
pub mod error;
pub mod policy;
pub mod role;
pub mod route;
pub mod verifier;

// =============================================================================
// Re-exports
// =============================================================================

pub use claims::{Claims, ClaimsBuilder};
pub use decision::{AccessEngine, Denial, Evaluation, Outcome, ACCESS_DENIED};
pub use error::{GateError, GateResult};
pub use policy::{GatePolicy, GatePolicyBuilder};
pub use role::Role;
pub use route::{Route, RouteClass, RouteTable};
pub use verifier::{CredentialSource, Credentials, TokenVerifier};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
