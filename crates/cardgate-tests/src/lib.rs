// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cardgate Integration Tests
//!
//! Cross-crate tests for the portal gate plus the fixtures and fakes they
//! share.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cardgate-tests
//! cargo test -p cardgate-tests --test integration_gate
//! cargo test -p cardgate-tests --test integration_api
//! cargo test -p cardgate-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Gate Tests (`integration_gate.rs`)
//! - The six reference scenarios
//! - Decision table properties over every token state
//! - Verifier failures collapsing into "no session"
//!
//! ### API Tests (`integration_api.rs`)
//! - Sign-in, session, sign-out through the full router
//! - Cookie and bearer credentials
//! - Blocked roles and base paths end to end
//!
//! ### Config Tests (`integration_config.rs`)
//! - YAML/TOML/JSON files to a working gate
//! - Placeholders and environment overrides
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use cardgate_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let verifier = StaticVerifier::new().with_token("t", ClaimsFixtures::admin());
//!     let engine = AccessEngine::new(PolicyFixtures::standard());
//!     // ...
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
