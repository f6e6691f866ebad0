// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route classification.

use serde::{Deserialize, Serialize};

use crate::error::{check_path, GateResult};

/// Default prefix of the credentials provider's endpoints.
pub const DEFAULT_API_AUTH_PREFIX: &str = "/api/auth";

/// Default routes reachable without a session.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &[
    "/login",
    "/forgot-password",
    "/reset-password",
    "/verify-email",
];

// =============================================================================
// RouteClass
// =============================================================================

/// How the gate treats a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Reachable without a session.
    Public,
    /// Credentials provider endpoint; never gated.
    ApiAuth,
    /// Requires a valid session with a permitted role.
    Protected,
}

impl RouteClass {
    /// Returns the class name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Public => "public",
            RouteClass::ApiAuth => "api_auth",
            RouteClass::Protected => "protected",
        }
    }
}

impl std::fmt::Display for RouteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Route
// =============================================================================

/// A classified request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<'a> {
    /// Request path, without the query string.
    pub path: &'a str,
    /// Raw query string, if any.
    pub query: Option<&'a str>,
    /// Classification of `path`.
    pub class: RouteClass,
}

impl Route<'_> {
    /// Returns the path with its query string, as the caller requested it.
    pub fn target(&self) -> String {
        match self.query {
            Some(query) if !query.is_empty() => format!("{}?{}", self.path, query),
            _ => self.path.to_string(),
        }
    }
}

// =============================================================================
// RouteTable
// =============================================================================

/// The fixed allow-list used to classify paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    api_auth_prefix: String,
    public_routes: Vec<String>,
}

impl RouteTable {
    /// Creates a route table, validating every entry.
    pub fn new(
        api_auth_prefix: impl Into<String>,
        public_routes: impl IntoIterator<Item = impl Into<String>>,
    ) -> GateResult<Self> {
        let api_auth_prefix = api_auth_prefix.into();
        check_path("api_auth_prefix", &api_auth_prefix)?;

        let public_routes: Vec<String> = public_routes.into_iter().map(Into::into).collect();
        for route in &public_routes {
            check_path("public_routes", route)?;
        }

        Ok(Self {
            api_auth_prefix,
            public_routes,
        })
    }

    /// Classifies a path.
    ///
    /// Both checks are plain prefix matches, so `/login/help` is public and
    /// `/api/auth/callback/credentials` is an auth endpoint.
    pub fn classify(&self, path: &str) -> RouteClass {
        if path.starts_with(&self.api_auth_prefix) {
            RouteClass::ApiAuth
        } else if self.is_public(path) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }

    /// Returns `true` if the path matches a public route.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes
            .iter()
            .any(|route| path.starts_with(route.as_str()))
    }

    /// Returns the auth-callback prefix.
    pub fn api_auth_prefix(&self) -> &str {
        &self.api_auth_prefix
    }

    /// Returns the public routes.
    pub fn public_routes(&self) -> &[String] {
        &self.public_routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            api_auth_prefix: DEFAULT_API_AUTH_PREFIX.to_string(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateError;

    #[test]
    fn test_classify_defaults() {
        let table = RouteTable::default();

        assert_eq!(table.classify("/api/auth/session"), RouteClass::ApiAuth);
        assert_eq!(table.classify("/api/auth"), RouteClass::ApiAuth);
        assert_eq!(table.classify("/login"), RouteClass::Public);
        assert_eq!(table.classify("/reset-password/abc123"), RouteClass::Public);
        assert_eq!(table.classify("/verify-email"), RouteClass::Public);
        assert_eq!(table.classify("/dashboard"), RouteClass::Protected);
        assert_eq!(table.classify("/api/offers"), RouteClass::Protected);
        assert_eq!(table.classify("/"), RouteClass::Protected);
        assert_eq!(table.classify(""), RouteClass::Protected);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let table = RouteTable::default();
        for path in ["/login", "/users/7", "/api/auth/csrf", "weird path"] {
            assert_eq!(table.classify(path), table.classify(path));
        }
    }

    #[test]
    fn test_custom_table() {
        let table = RouteTable::new("/auth", ["/signin", "/health"]).unwrap();

        assert_eq!(table.classify("/auth/callback"), RouteClass::ApiAuth);
        assert_eq!(table.classify("/health"), RouteClass::Public);
        assert_eq!(table.classify("/login"), RouteClass::Protected);
        assert_eq!(table.classify("/api/auth/session"), RouteClass::Protected);
    }

    #[test]
    fn test_invalid_entries() {
        assert_eq!(
            RouteTable::new("api/auth", ["/login"]),
            Err(GateError::invalid_path("api_auth_prefix", "api/auth"))
        );
        assert_eq!(
            RouteTable::new("/api/auth", [""]),
            Err(GateError::empty("public_routes"))
        );
    }

    #[test]
    fn test_route_target() {
        let route = Route {
            path: "/offers",
            query: Some("page=2"),
            class: RouteClass::Protected,
        };
        assert_eq!(route.target(), "/offers?page=2");

        let route = Route {
            query: Some(""),
            ..route
        };
        assert_eq!(route.target(), "/offers");
    }
}
