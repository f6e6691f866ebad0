// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cardgate-config
//!
//! Configuration for the cardgate portal gate.
//!
//! ## Features
//!
//! - **Schema**: Server, auth, gate, and logging sections with defaults
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `CARDGATE_*` variables and `NEXTAUTH_SECRET`
//! - **Policy Construction**: Turns the `gate` section into a `GatePolicy`
//!
//! ## Quick Start
//!
//! ```no_run
//! use cardgate_config::load_config;
//!
//! let config = load_config("cardgate.yaml").unwrap();
//! let policy = config.policy().unwrap();
//!
//! println!("Login page: {}", policy.login_path());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    AuthConfig, CardgateConfig, GateConfig, JwtAlgorithm, LogFormat, LogLevel, LoggingConfig,
    SecretValue, ServerConfig, UserConfig,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
