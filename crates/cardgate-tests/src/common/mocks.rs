// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Fake [`TokenVerifier`]s so the gate can be tested without signing
//! anything.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cardgate_core::{Claims, Credentials, TokenVerifier};

// =============================================================================
// StaticVerifier
// =============================================================================

/// Verifier backed by a fixed token table.
///
/// Unknown tokens verify to nothing, like a bad signature would. Expired
/// claims are rejected the way a real verifier rejects them.
#[derive(Debug, Default)]
pub struct StaticVerifier {
    sessions: HashMap<String, Claims>,
    calls: AtomicU64,
}

impl StaticVerifier {
    /// Creates a verifier that accepts nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `token` as `claims`.
    pub fn with_token(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.sessions.insert(token.into(), claims);
        self
    }

    /// Number of times the verifier was consulted.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, credentials: &Credentials) -> Option<Claims> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let claims = self.sessions.get(credentials.token()?)?;
        (!claims.is_expired()).then(|| claims.clone())
    }
}

// =============================================================================
// RejectingVerifier
// =============================================================================

/// Verifier that rejects every token, like one with the wrong secret.
#[derive(Debug, Default)]
pub struct RejectingVerifier;

#[async_trait]
impl TokenVerifier for RejectingVerifier {
    async fn verify(&self, _credentials: &Credentials) -> Option<Claims> {
        None
    }
}
