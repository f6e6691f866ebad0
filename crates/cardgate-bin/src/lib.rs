// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cardgate-bin
//!
//! Command line for the cardgate portal gate.
//!
//! - CLI argument parsing with clap
//! - Portal runtime: config to [`cardgate_api::AppState`] to a served router
//! - Graceful shutdown on SIGINT/SIGTERM
//! - Logging initialization
//! - Commands: `run`, `validate`, `check`, `token`, `version`
//!
//! ## Usage
//!
//! ```bash
//! # Serve the portal gate (default command)
//! cardgate -c /etc/cardgate/cardgate.yaml
//!
//! # Validate configuration
//! cardgate validate --strict
//!
//! # What would the gate do with a scout on /dashboard?
//! cardgate check /dashboard --role SCOUT
//!
//! # Mint a session token for local testing
//! cardgate token --sub u-1 --role ADMIN
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{build_state, PortalRuntime, RuntimeBuilder};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
