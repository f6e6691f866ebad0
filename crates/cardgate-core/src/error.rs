// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while building a gate policy.
//!
//! Gate decisions themselves never fail; every request maps to an
//! [`Outcome`](crate::Outcome). Errors only arise when a policy is assembled
//! from invalid route or role definitions.

use thiserror::Error;

/// Result type alias for gate construction.
pub type GateResult<T> = Result<T, GateError>;

/// Errors for invalid gate definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// A configured path does not start with `/`.
    #[error("Invalid path for '{field}': '{path}' must start with '/'")]
    InvalidPath {
        /// The setting that holds the path.
        field: String,
        /// The offending value.
        path: String,
    },

    /// A configured path or prefix is empty.
    #[error("Empty value for '{field}'")]
    Empty {
        /// The setting that is empty.
        field: String,
    },

    /// The login route is not reachable without a session.
    #[error("Login path '{path}' is not covered by any public route")]
    LoginNotPublic {
        /// The configured login path.
        path: String,
    },

    /// The landing page is the site root, which the portal redirects to the
    /// landing page.
    #[error("Dashboard path cannot be the site root '/'")]
    RootDashboard,

    /// The landing page would itself be gated away from every session.
    #[error("Dashboard path '{path}' must be a protected route")]
    DashboardNotProtected {
        /// The configured dashboard path.
        path: String,
    },
}

impl GateError {
    /// Creates an invalid path error.
    pub fn invalid_path(field: impl Into<String>, path: impl Into<String>) -> Self {
        Self::InvalidPath {
            field: field.into(),
            path: path.into(),
        }
    }

    /// Creates an empty value error.
    pub fn empty(field: impl Into<String>) -> Self {
        Self::Empty {
            field: field.into(),
        }
    }
}

/// Checks that `path` is a non-empty absolute path.
pub(crate) fn check_path(field: &str, path: &str) -> GateResult<()> {
    if path.is_empty() {
        return Err(GateError::empty(field));
    }
    if !path.starts_with('/') {
        return Err(GateError::invalid_path(field, path));
    }
    Ok(())
}
