// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Verified identity carried by a portal session token.
///
/// The gate only reads claims; issuing and expiring them belongs to the
/// credentials provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    // =========================================================================
    // Standard JWT Claims (RFC 7519)
    // =========================================================================
    /// Subject - the user ID.
    pub sub: String,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    // =========================================================================
    // Portal Claims
    // =========================================================================
    /// The user's role.
    pub role: Role,

    /// User's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// User's email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Council the user belongs to, for council-scoped roles.
    #[serde(default, rename = "councilId", skip_serializing_if = "Option::is_none")]
    pub council_id: Option<String>,
}

impl Claims {
    /// Creates new claims for a user.
    pub fn new(user_id: impl Into<String>, role: Role, expires_in_secs: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: user_id.into(),
            iat: now,
            exp: now + expires_in_secs,
            iss: None,
            role,
            name: None,
            email: None,
            council_id: None,
        }
    }

    /// Creates a builder for constructing claims.
    pub fn builder(user_id: impl Into<String>) -> ClaimsBuilder {
        ClaimsBuilder::new(user_id)
    }

    /// Returns the user ID.
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Returns the role.
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Sets the user's name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the user's email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// =============================================================================
// Claims Builder
// =============================================================================

/// Builder for constructing session claims.
#[derive(Debug)]
pub struct ClaimsBuilder {
    user_id: String,
    role: Role,
    expires_in_secs: i64,
    issuer: Option<String>,
    name: Option<String>,
    email: Option<String>,
    council_id: Option<String>,
}

impl ClaimsBuilder {
    /// Creates a new builder. The role defaults to `ADMIN`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::new(Role::ADMIN),
            expires_in_secs: 3600,
            issuer: None,
            name: None,
            email: None,
            council_id: None,
        }
    }

    /// Sets the role.
    pub fn role(mut self, role: impl Into<Role>) -> Self {
        self.role = role.into();
        self
    }

    /// Sets the expiration time in seconds.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in_secs = seconds;
        self
    }

    /// Sets the issuer.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the user's name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the user's email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the council ID.
    pub fn council_id(mut self, council_id: impl Into<String>) -> Self {
        self.council_id = Some(council_id.into());
        self
    }

    /// Builds the claims.
    pub fn build(self) -> Claims {
        let mut claims = Claims::new(self.user_id, self.role, self.expires_in_secs);
        claims.iss = self.issuer;
        claims.name = self.name;
        claims.email = self.email;
        claims.council_id = self.council_id;
        claims
    }
}

// =============================================================================
// Tests
// =============================================================================
