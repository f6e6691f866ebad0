// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.
//!
//! ```yaml
//! server:
//!   port: 3000
//! auth:
//!   secret: "${NEXTAUTH_SECRET}"
//!   users:
//!     - id: admin-1
//!       email: admin@campcard.org
//!       password: changeme
//!       role: ADMIN
//! gate:
//!   blocked_roles: [SCOUT, PARENT]
//! logging:
//!   level: info
//! ```

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use cardgate_core::policy::{
    DEFAULT_BLOCKED_ROLES, DEFAULT_DASHBOARD_PATH, DEFAULT_DENIAL_MESSAGE, DEFAULT_LOGIN_PATH,
};
use cardgate_core::route::{DEFAULT_API_AUTH_PREFIX, DEFAULT_PUBLIC_ROUTES};
use cardgate_core::GatePolicy;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Session cookie names, most specific first.
pub const DEFAULT_COOKIE_NAMES: &[&str] = &[
    "__Secure-next-auth.session-token",
    "next-auth.session-token",
];

/// Thirty days, the credentials provider's default session lifetime.
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

// =============================================================================
// CardgateConfig
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardgateConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Session token settings.
    pub auth: AuthConfig,
    /// Route gate settings.
    pub gate: GateConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl CardgateConfig {
    /// Validates the whole configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.policy()?;
        Ok(())
    }

    /// Builds the gate policy described by this configuration.
    pub fn policy(&self) -> ConfigResult<GatePolicy> {
        self.gate.to_policy(&self.server.base_path)
    }
}

// =============================================================================
// Server
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
    /// Path prefix the portal is served under (empty for the root).
    pub base_path: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            base_path: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "must not be 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Session token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret used to sign session tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretValue>,
    /// Signing algorithm.
    pub algorithm: JwtAlgorithm,
    /// Expected issuer; not checked when unset.
    pub issuer: Option<String>,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
    /// Lifetime of issued sessions in seconds.
    pub session_max_age_secs: i64,
    /// Cookie names searched for a session token, in order.
    pub cookie_names: Vec<String>,
    /// Whether issued cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Users accepted by the credentials sign-in endpoint.
    pub users: Vec<UserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: JwtAlgorithm::default(),
            issuer: None,
            leeway_secs: 60,
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            cookie_names: DEFAULT_COOKIE_NAMES.iter().map(|c| c.to_string()).collect(),
            secure_cookies: false,
            users: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Returns the secret, if one is configured and non-empty.
    pub fn secret(&self) -> Option<&str> {
        self.secret
            .as_ref()
            .map(SecretValue::expose)
            .filter(|s| !s.is_empty())
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.secret().is_none() {
            return Err(ConfigError::missing_field("auth.secret"));
        }
        if self.session_max_age_secs <= 0 {
            return Err(ConfigError::validation(
                "auth.session_max_age_secs",
                "must be greater than 0",
            ));
        }
        if self.cookie_names.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::validation(
                "auth.cookie_names",
                "at least one cookie name is required",
            ));
        }

        let mut emails = HashSet::new();
        for user in &self.users {
            user.validate()?;
            if !emails.insert(user.email.to_lowercase()) {
                return Err(ConfigError::DuplicateUser {
                    email: user.email.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A user allowed to sign in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// User ID, used as the token subject.
    pub id: String,
    /// Sign-in email.
    pub email: String,
    /// Sign-in password.
    pub password: SecretValue,
    /// Role tag.
    pub role: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Council the user belongs to.
    #[serde(default)]
    pub council_id: Option<String>,
}

impl UserConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::validation("auth.users.id", "cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(ConfigError::validation(
                "auth.users.email",
                format!("'{}' is not an email address", self.email),
            ));
        }
        if self.role.trim().is_empty() {
            return Err(ConfigError::validation(
                "auth.users.role",
                format!("missing role for '{}'", self.email),
            ));
        }
        Ok(())
    }
}

/// Session token signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

// =============================================================================
// Gate
// =============================================================================

/// Route gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Login page.
    pub login_path: String,
    /// Landing page for signed-in users.
    pub dashboard_path: String,
    /// Prefix of the credentials provider's endpoints.
    pub api_auth_prefix: String,
    /// Routes reachable without a session (prefix match).
    pub public_routes: Vec<String>,
    /// Roles refused by the portal.
    pub blocked_roles: Vec<String>,
    /// Denial message; `{role}` is replaced with the role name.
    pub denial_message: String,
    /// Expire the session cookie when a blocked role is refused.
    pub clear_blocked_session: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_string(),
            api_auth_prefix: DEFAULT_API_AUTH_PREFIX.to_string(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
            blocked_roles: DEFAULT_BLOCKED_ROLES.iter().map(|r| r.to_string()).collect(),
            denial_message: DEFAULT_DENIAL_MESSAGE.to_string(),
            clear_blocked_session: false,
        }
    }
}

impl GateConfig {
    /// Builds a [`GatePolicy`] from these settings.
    pub fn to_policy(&self, base_path: &str) -> ConfigResult<GatePolicy> {
        let policy = GatePolicy::builder()
            .login_path(&self.login_path)
            .dashboard_path(&self.dashboard_path)
            .api_auth_prefix(&self.api_auth_prefix)
            .public_routes(self.public_routes.iter().cloned())
            .blocked_roles(self.blocked_roles.iter().cloned())
            .denial_message(&self.denial_message)
            .base_path(base_path)
            .clear_blocked_session(self.clear_blocked_session)
            .build()?;
        Ok(policy)
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Compact single-line output.
    Compact,
    /// JSON for log aggregation.
    Json,
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret that is never printed.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cardgate_core::Role;

    fn valid_config() -> CardgateConfig {
        let mut config = CardgateConfig::default();
        config.auth.secret = Some(SecretValue::new("a-secret-that-is-at-least-32-bytes-long"));
        config
    }

    #[test]
    fn test_defaults() {
        let config = CardgateConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.gate.login_path, "/login");
        assert_eq!(config.auth.cookie_names.len(), 2);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_secret_required() {
        let config = CardgateConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field }) if field == "auth.secret"
        ));

        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = valid_config();
        config.gate.blocked_roles = vec!["troop_leader".to_string()];
        config.server.base_path = "/portal".to_string();

        let policy = config.policy().unwrap();
        assert!(policy.is_blocked(&Role::new(Role::TROOP_LEADER)));
        assert!(!policy.is_blocked(&Role::new(Role::SCOUT)));
        assert_eq!(policy.url_for("/login"), "/portal/login");
    }

    #[test]
    fn test_invalid_gate_section() {
        let mut config = valid_config();
        config.gate.login_path = "/signin".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Gate(_))));
    }

    #[test]
    fn test_duplicate_users() {
        let mut config = valid_config();
        let user = UserConfig {
            id: "u1".to_string(),
            email: "Admin@CampCard.org".to_string(),
            password: SecretValue::new("pw"),
            role: "ADMIN".to_string(),
            name: None,
            council_id: None,
        };
        let mut twin = user.clone();
        twin.id = "u2".to_string();
        twin.email = "admin@campcard.org".to_string();
        config.auth.users = vec![user, twin];

        assert!(matches!(config.validate(), Err(ConfigError::DuplicateUser { .. })));
    }

    #[test]
    fn test_duplicate_emails_ignore_case() {
        let mut config = valid_config();
        for email in ["leader@campcard.org", "LEADER@campcard.org"] {
            config.auth.users.push(UserConfig {
                id: "u1".to_string(),
                email: email.to_string(),
                password: SecretValue::new("pw"),
                role: "TROOP_LEADER".to_string(),
                name: Some("Lee".to_string()),
                council_id: None,
            });
        }

        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateUser { .. })
        ));
    }

    #[test]
    fn test_secret_is_redacted() {
        let secret = SecretValue::new("hunter2");
        assert_eq!(format!("{:?}", secret), "SecretValue(***)");
        assert_eq!(secret.to_string(), "***");
    }
}
