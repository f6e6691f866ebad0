// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Gate policy.
//!
//! A [`GatePolicy`] is built once at startup and never changes afterwards.
//! Every field is private and there are no setters, so the allow-list and the
//! blocked-role set stay fixed for the lifetime of the process.

use std::collections::BTreeSet;

use crate::error::{check_path, GateError, GateResult};
use crate::role::Role;
use crate::route::{RouteClass, RouteTable, DEFAULT_API_AUTH_PREFIX, DEFAULT_PUBLIC_ROUTES};

/// Default login page.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default landing page for signed-in users.
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Roles that may not use the admin portal by default.
pub const DEFAULT_BLOCKED_ROLES: &[&str] = &[Role::SCOUT, Role::PARENT];

/// Default denial message. `{role}` is replaced with the role's display name.
pub const DEFAULT_DENIAL_MESSAGE: &str =
    "Your role ({role}) does not have access to the admin portal.";

// =============================================================================
// GatePolicy
// =============================================================================

/// Immutable configuration consulted by the access decision engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    routes: RouteTable,
    login_path: String,
    dashboard_path: String,
    blocked_roles: BTreeSet<Role>,
    denial_message: String,
    base_path: String,
    clear_blocked_session: bool,
}

impl GatePolicy {
    /// Creates a policy builder starting from the portal defaults.
    pub fn builder() -> GatePolicyBuilder {
        GatePolicyBuilder::new()
    }

    /// Returns the route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Classifies a path.
    pub fn classify(&self, path: &str) -> RouteClass {
        self.routes.classify(path)
    }

    /// Returns the login path.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Returns the dashboard path.
    pub fn dashboard_path(&self) -> &str {
        &self.dashboard_path
    }

    /// Returns `true` if `path` is the login page itself.
    pub fn is_login_path(&self, path: &str) -> bool {
        path == self.login_path
            || path
                .strip_prefix(self.login_path.as_str())
                .is_some_and(|rest| rest == "/")
    }

    /// Returns the blocked roles.
    pub fn blocked_roles(&self) -> &BTreeSet<Role> {
        &self.blocked_roles
    }

    /// Returns `true` if the role may not use the portal.
    pub fn is_blocked(&self, role: &Role) -> bool {
        self.blocked_roles.contains(role)
    }

    /// Returns the denial message for a role.
    pub fn denial_message(&self, role: &Role) -> String {
        self.denial_message.replace("{role}", &role.display_name())
    }

    /// Returns the deployment base path (empty when served at the root).
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Prefixes a portal path with the base path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    /// Returns `true` if denial redirects should also clear the session.
    pub fn clear_blocked_session(&self) -> bool {
        self.clear_blocked_session
    }
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            routes: RouteTable::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_string(),
            blocked_roles: DEFAULT_BLOCKED_ROLES.iter().map(Role::new).collect(),
            denial_message: DEFAULT_DENIAL_MESSAGE.to_string(),
            base_path: String::new(),
            clear_blocked_session: false,
        }
    }
}

// =============================================================================
// GatePolicyBuilder
// =============================================================================

/// Builder for [`GatePolicy`].
#[derive(Debug, Clone)]
pub struct GatePolicyBuilder {
    api_auth_prefix: String,
    public_routes: Vec<String>,
    login_path: String,
    dashboard_path: String,
    blocked_roles: Vec<String>,
    denial_message: String,
    base_path: String,
    clear_blocked_session: bool,
}

impl GatePolicyBuilder {
    /// Creates a builder with the portal defaults.
    pub fn new() -> Self {
        Self {
            api_auth_prefix: DEFAULT_API_AUTH_PREFIX.to_string(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_string(),
            blocked_roles: DEFAULT_BLOCKED_ROLES.iter().map(|r| r.to_string()).collect(),
            denial_message: DEFAULT_DENIAL_MESSAGE.to_string(),
            base_path: String::new(),
            clear_blocked_session: false,
        }
    }

    /// Sets the auth-callback prefix.
    pub fn api_auth_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_auth_prefix = prefix.into();
        self
    }

    /// Replaces the public routes.
    pub fn public_routes(mut self, routes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.public_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a public route.
    pub fn add_public_route(mut self, route: impl Into<String>) -> Self {
        self.public_routes.push(route.into());
        self
    }

    /// Sets the login path.
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Sets the dashboard path.
    pub fn dashboard_path(mut self, path: impl Into<String>) -> Self {
        self.dashboard_path = path.into();
        self
    }

    /// Replaces the blocked roles.
    pub fn blocked_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.blocked_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the denial message template.
    pub fn denial_message(mut self, message: impl Into<String>) -> Self {
        self.denial_message = message.into();
        self
    }

    /// Sets the deployment base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Clears the session cookie on denial redirects.
    pub fn clear_blocked_session(mut self, enabled: bool) -> Self {
        self.clear_blocked_session = enabled;
        self
    }

    /// Validates and builds the policy.
    pub fn build(self) -> GateResult<GatePolicy> {
        check_path("login_path", &self.login_path)?;
        check_path("dashboard_path", &self.dashboard_path)?;
        if self.dashboard_path.trim_end_matches('/').is_empty() {
            return Err(GateError::RootDashboard);
        }

        let base_path = self.base_path.trim_end_matches('/').to_string();
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return Err(GateError::invalid_path("base_path", base_path));
        }

        let routes = RouteTable::new(self.api_auth_prefix, self.public_routes)?;

        if routes.classify(&self.login_path) != RouteClass::Public {
            return Err(GateError::LoginNotPublic {
                path: self.login_path,
            });
        }
        if routes.classify(&self.dashboard_path) != RouteClass::Protected {
            return Err(GateError::DashboardNotProtected {
                path: self.dashboard_path,
            });
        }

        let blocked_roles = self
            .blocked_roles
            .iter()
            .filter(|tag| !tag.trim().is_empty())
            .map(Role::new)
            .collect();

        Ok(GatePolicy {
            routes,
            login_path: self.login_path,
            dashboard_path: self.dashboard_path,
            blocked_roles,
            denial_message: self.denial_message,
            base_path,
            clear_blocked_session: self.clear_blocked_session,
        })
    }
}

impl Default for GatePolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
