// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Response bodies.

use cardgate_core::Claims;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Health
// =============================================================================

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy(uptime_seconds: u64) -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
            uptime_seconds,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// The signed-in user as exposed to the portal front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User ID.
    pub id: String,
    /// Role tag.
    pub role: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Council the user belongs to.
    #[serde(
        default,
        rename = "councilId",
        skip_serializing_if = "Option::is_none"
    )]
    pub council_id: Option<String>,
}

/// Body of `GET /api/auth/session` for a signed-in caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The user.
    pub user: SessionUser,
    /// When the session expires.
    pub expires: Option<DateTime<Utc>>,
}

impl From<&Claims> for SessionResponse {
    fn from(claims: &Claims) -> Self {
        Self {
            user: SessionUser {
                id: claims.sub.clone(),
                role: claims.role.as_str().to_string(),
                name: claims.name.clone(),
                email: claims.email.clone(),
                council_id: claims.council_id.clone(),
            },
            expires: claims.expires_at(),
        }
    }
}
