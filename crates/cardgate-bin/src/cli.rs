// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Serve the portal behind the gate (default)
//! - `validate`: Validate the configuration file
//! - `check`: Show what the gate does with one path
//! - `token`: Mint a session token
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// cardgate - route-access gate for the Camp Card admin portal
///
/// Sends anonymous visitors to the login page, signed-in users away from
/// it, and refuses roles that have no business in the admin portal.
#[derive(Parser, Debug)]
#[command(
    name = "cardgate",
    author = "Sylvex <contact@sylvex.io>",
    version = cardgate_core::VERSION,
    about = "Route-access gate for the Camp Card admin portal",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "cardgate.yaml",
        env = "CARDGATE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); falls back to the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact); falls back to the config file
    #[arg(long, env = "CARDGATE_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the portal behind the gate
    ///
    /// This is the default command when no subcommand is specified.
    Run,

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration without starting the server.
    Validate(ValidateArgs),

    /// Show how the gate treats a path
    ///
    /// Classifies the path and prints the outcome for an anonymous caller,
    /// a caller with the given role, or the holder of the given token.
    Check(CheckArgs),

    /// Mint a session token signed with the configured secret
    Token(TokenArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration (secrets redacted) after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Request path, optionally with a query string
    pub path: String,

    /// Pretend the caller is signed in with this role
    #[arg(short, long)]
    pub role: Option<String>,

    /// Verify this session token and use its claims
    #[arg(short, long, conflicts_with = "role")]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `token` command.
#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Subject (user ID)
    #[arg(long)]
    pub sub: String,

    /// Role tag
    #[arg(long)]
    pub role: String,

    /// Lifetime in seconds (default: auth.session_max_age_secs)
    #[arg(long)]
    pub expires_in: Option<i64>,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Email
    #[arg(long)]
    pub email: Option<String>,

    /// Council ID
    #[arg(long)]
    pub council_id: Option<String>,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<cardgate_config::LogFormat> for LogFormat {
    fn from(format: cardgate_config::LogFormat) -> Self {
        match format {
            cardgate_config::LogFormat::Text => LogFormat::Text,
            cardgate_config::LogFormat::Json => LogFormat::Json,
            cardgate_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Log level forced by `-q`/`-v`/`-l`, if any.
    pub fn log_level_override(&self) -> Option<&str> {
        if self.quiet {
            Some("warn")
        } else if self.verbose {
            Some("debug")
        } else {
            self.log_level.as_deref()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["cardgate"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run));
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["cardgate", "-c", "/etc/cardgate/cardgate.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/cardgate/cardgate.yaml"));
    }

    #[test]
    fn test_log_level_override() {
        assert_eq!(Cli::parse_from(["cardgate", "-q"]).log_level_override(), Some("warn"));
        assert_eq!(Cli::parse_from(["cardgate", "-v"]).log_level_override(), Some("debug"));
        assert_eq!(
            Cli::parse_from(["cardgate", "-l", "trace"]).log_level_override(),
            Some("trace")
        );
        assert_eq!(Cli::parse_from(["cardgate"]).log_level_override(), None);
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["cardgate", "validate", "--show-config", "-f", "json"]);
        let Some(Commands::Validate(args)) = cli.command else {
            panic!("Expected Validate command");
        };
        assert!(args.show_config);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from(["cardgate", "check", "/dashboard?tab=2", "--role", "SCOUT"]);
        let Some(Commands::Check(args)) = cli.command else {
            panic!("Expected Check command");
        };
        assert_eq!(args.path, "/dashboard?tab=2");
        assert_eq!(args.role.as_deref(), Some("SCOUT"));
        assert!(args.token.is_none());
    }

    #[test]
    fn test_check_role_conflicts_with_token() {
        let result = Cli::try_parse_from([
            "cardgate", "check", "/users", "--role", "ADMIN", "--token", "abc",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_command() {
        let cli = Cli::parse_from([
            "cardgate", "token", "--sub", "u-1", "--role", "COUNCIL_ADMIN", "--expires-in", "600",
        ]);
        let Some(Commands::Token(args)) = cli.command else {
            panic!("Expected Token command");
        };
        assert_eq!(args.sub, "u-1");
        assert_eq!(args.role, "COUNCIL_ADMIN");
        assert_eq!(args.expires_in, Some(600));
    }

    #[test]
    fn test_log_format_from_config() {
        assert_eq!(LogFormat::from(cardgate_config::LogFormat::Json), LogFormat::Json);
    }
}
