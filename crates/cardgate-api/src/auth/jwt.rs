// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token verification and issuing.

use std::sync::Arc;

use async_trait::async_trait;
use cardgate_core::{Claims, Credentials, TokenVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{ApiError, ApiResult};

/// Recommended minimum secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

// =============================================================================
// JwtConfig
// =============================================================================

/// Session token settings.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared signing secret.
    pub secret: String,
    /// Signing algorithm (HMAC family).
    pub algorithm: Algorithm,
    /// Expected issuer; not checked when `None`.
    pub issuer: Option<String>,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
    /// Lifetime of issued tokens in seconds.
    pub expiration_secs: i64,
}

impl JwtConfig {
    /// Creates a configuration with the given secret and HS256.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            issuer: None,
            leeway_secs: 60,
            expiration_secs: 30 * 24 * 60 * 60,
        }
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the clock leeway.
    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    /// Sets the token lifetime.
    pub fn with_expiration(mut self, secs: i64) -> Self {
        self.expiration_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("session secret is not configured"));
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ApiError::internal(format!(
                "unsupported session algorithm {:?}",
                self.algorithm
            )));
        }
        if self.secret.len() < MIN_SECRET_LEN {
            tracing::warn!(
                "Session secret is shorter than recommended ({} bytes)",
                MIN_SECRET_LEN
            );
        }
        Ok(())
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway_secs;
        validation.validate_aud = false;
        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("leeway_secs", &self.leeway_secs)
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

// =============================================================================
// JwtVerifier
// =============================================================================

/// [`TokenVerifier`] backed by a shared HMAC secret.
///
/// Every decode failure becomes `None`, so malformed, expired and forged
/// tokens all look like a missing session to the gate.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtVerifier {
    /// Creates a verifier.
    pub fn new(config: &JwtConfig) -> ApiResult<Self> {
        config.validate()?;

        Ok(Self {
            decoding_key: Arc::new(DecodingKey::from_secret(config.secret.as_bytes())),
            validation: Arc::new(config.validation()),
        })
    }

    /// Decodes and validates a raw token.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                None
            }
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, credentials: &Credentials) -> Option<Claims> {
        credentials.token().and_then(|token| self.verify_token(token))
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

// =============================================================================
// JwtIssuer
// =============================================================================

/// Mints session tokens with the same secret the verifier checks.
#[derive(Clone)]
pub struct JwtIssuer {
    config: Arc<JwtConfig>,
    encoding_key: Arc<EncodingKey>,
}

impl JwtIssuer {
    /// Creates an issuer.
    pub fn new(config: JwtConfig) -> ApiResult<Self> {
        config.validate()?;
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
        })
    }

    /// Signs the given claims. The configured issuer is filled in when unset.
    pub fn issue(&self, claims: &Claims) -> ApiResult<String> {
        let mut claims = claims.clone();
        if claims.iss.is_none() {
            claims.iss = self.config.issuer.clone();
        }

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to create token: {}", e)))
    }

    /// Returns the lifetime of issued tokens in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("algorithm", &self.config.algorithm)
            .field("issuer", &self.config.issuer)
            .field("expiration_secs", &self.config.expiration_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cardgate_core::Role;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";

    fn pair(config: JwtConfig) -> (JwtIssuer, JwtVerifier) {
        let verifier = JwtVerifier::new(&config).unwrap();
        (JwtIssuer::new(config).unwrap(), verifier)
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let (issuer, verifier) = pair(JwtConfig::new(SECRET));
        let claims = Claims::builder("u-1")
            .role(Role::COUNCIL_ADMIN)
            .email("ca@campcard.org")
            .council_id("c-9")
            .build();

        let token = issuer.issue(&claims).unwrap();
        let verified = verifier
            .verify(&Credentials::from_bearer(token))
            .await
            .unwrap();

        assert_eq!(verified.sub, "u-1");
        assert!(verified.role().is(Role::COUNCIL_ADMIN));
        assert_eq!(verified.council_id.as_deref(), Some("c-9"));
    }

    #[tokio::test]
    async fn test_absent_credentials() {
        let (_, verifier) = pair(JwtConfig::new(SECRET));
        assert!(verifier.verify(&Credentials::none()).await.is_none());
    }

    #[test]
    fn test_expired_token() {
        let (issuer, verifier) = pair(JwtConfig::new(SECRET).with_leeway(0));
        let claims = Claims::new("u-1", Role::new(Role::ADMIN), -3600);

        let token = issuer.issue(&claims).unwrap();
        assert!(verifier.verify_token(&token).is_none());
    }

    #[test]
    fn test_malformed_token() {
        let (_, verifier) = pair(JwtConfig::new(SECRET));
        assert!(verifier.verify_token("invalid.token.here").is_none());
        assert!(verifier.verify_token("").is_none());
    }

    #[test]
    fn test_wrong_secret() {
        let (issuer, _) = pair(JwtConfig::new("secret-one-for-testing-purposes-only"));
        let (_, verifier) = pair(JwtConfig::new("secret-two-for-testing-purposes-only"));

        let token = issuer
            .issue(&Claims::new("u-1", Role::new(Role::ADMIN), 3600))
            .unwrap();
        assert!(verifier.verify_token(&token).is_none());
    }

    #[test]
    fn test_issuer_validation() {
        let (issuer, _) = pair(JwtConfig::new(SECRET).with_issuer("someone-else"));
        let (_, verifier) = pair(JwtConfig::new(SECRET).with_issuer("campcard"));

        let token = issuer
            .issue(&Claims::new("u-1", Role::new(Role::ADMIN), 3600))
            .unwrap();
        assert!(verifier.verify_token(&token).is_none());

        let (issuer, verifier) = pair(JwtConfig::new(SECRET).with_issuer("campcard"));
        let token = issuer
            .issue(&Claims::new("u-1", Role::new(Role::ADMIN), 3600))
            .unwrap();
        assert_eq!(
            verifier.verify_token(&token).unwrap().iss.as_deref(),
            Some("campcard")
        );
    }

    #[test]
    fn test_algorithm_mismatch() {
        let (issuer, _) = pair(JwtConfig::new(SECRET).with_algorithm(Algorithm::HS512));
        let (_, verifier) = pair(JwtConfig::new(SECRET));

        let token = issuer
            .issue(&Claims::new("u-1", Role::new(Role::ADMIN), 3600))
            .unwrap();
        assert!(verifier.verify_token(&token).is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(JwtConfig::new("").validate().is_err());
        assert!(JwtConfig::new("short").validate().is_ok());
        assert!(JwtConfig::new(SECRET)
            .with_algorithm(Algorithm::RS256)
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", JwtConfig::new(SECRET));
        assert!(!debug.contains(SECRET));
    }
}
