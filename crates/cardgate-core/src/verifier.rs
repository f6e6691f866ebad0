// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token verification seam.
//!
//! The gate never inspects tokens itself. An HTTP adapter lifts whatever
//! credential the request carries into [`Credentials`], and a
//! [`TokenVerifier`] turns that into verified [`Claims`] or nothing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::claims::Claims;

// =============================================================================
// Credentials
// =============================================================================

/// Where a session token was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum CredentialSource {
    /// A session cookie with the given name.
    Cookie(String),
    /// An `Authorization: Bearer` header.
    Bearer,
}

/// The credential carried by a request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<(String, CredentialSource)>,
}

impl Credentials {
    /// Credentials for a request that carries no token.
    pub fn none() -> Self {
        Self::default()
    }

    /// Credentials from a session cookie. Empty values count as absent.
    pub fn from_cookie(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_source(token.into(), CredentialSource::Cookie(name.into()))
    }

    /// Credentials from a bearer header. Empty values count as absent.
    pub fn from_bearer(token: impl Into<String>) -> Self {
        Self::with_source(token.into(), CredentialSource::Bearer)
    }

    fn with_source(token: String, source: CredentialSource) -> Self {
        let token = token.trim().to_string();
        if token.is_empty() {
            Self::none()
        } else {
            Self {
                token: Some((token, source)),
            }
        }
    }

    /// Returns the raw token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|(token, _)| token.as_str())
    }

    /// Returns where the token was found.
    pub fn source(&self) -> Option<&CredentialSource> {
        self.token.as_ref().map(|(_, source)| source)
    }

    /// Returns `true` if no token is present.
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

// =============================================================================
// TokenVerifier
// =============================================================================

/// Verifies a session credential.
///
/// Implementations must collapse every failure (missing, malformed, expired,
/// badly signed) into `None`; the gate treats all of them as "no session".
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the verified claims, or `None` if there is no valid session.
    async fn verify(&self, credentials: &Credentials) -> Option<Claims>;
}

#[async_trait]
impl<T: TokenVerifier + ?Sized> TokenVerifier for Arc<T> {
    async fn verify(&self, credentials: &Credentials) -> Option<Claims> {
        (**self).verify(credentials).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tokens_are_absent() {
        assert!(Credentials::from_cookie("next-auth.session-token", "").is_empty());
        assert!(Credentials::from_bearer("   ").is_empty());
        assert!(Credentials::none().token().is_none());
    }

    #[test]
    fn test_credential_source() {
        let creds = Credentials::from_cookie("next-auth.session-token", "abc");
        assert_eq!(creds.token(), Some("abc"));
        assert_eq!(
            creds.source(),
            Some(&CredentialSource::Cookie("next-auth.session-token".to_string()))
        );

        let creds = Credentials::from_bearer("xyz");
        assert_eq!(creds.source(), Some(&CredentialSource::Bearer));
    }
}
