// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use anyhow::Context;
use cardgate_api::auth::{MIN_SECRET_LEN, SECURE_PREFIX};
use cardgate_config::CardgateConfig;
use serde_json::Value;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = cardgate_config::load_config(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;
    let policy = config.policy()?;
    let warnings = validation_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Listen:        {}", config.server.socket_addr());
            println!(
                "  Base path:     {}",
                if policy.base_path().is_empty() { "/" } else { policy.base_path() }
            );
            println!("  Login:         {}", policy.login_path());
            println!("  Dashboard:     {}", policy.dashboard_path());
            println!("  Public routes: {}", policy.routes().public_routes().join(", "));
            println!(
                "  Blocked roles: {}",
                policy
                    .blocked_roles()
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("  Users:         {}", config.auth.users.len());

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                let rendered = serde_json::to_string_pretty(&redacted(&config)?)
                    .context("rendering configuration")?;
                println!("{}", rendered);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "listen": config.server.socket_addr().to_string(),
                    "base_path": policy.base_path(),
                    "login_path": policy.login_path(),
                    "dashboard_path": policy.dashboard_path(),
                    "public_routes": policy.routes().public_routes(),
                    "blocked_roles": policy.blocked_roles(),
                    "user_count": config.auth.users.len(),
                },
                "warnings": warnings,
                "config": if args.show_config { Some(redacted(&config)?) } else { None },
            });
            let rendered =
                serde_json::to_string_pretty(&output).context("rendering validation result")?;
            println!("{}", rendered);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Problems that do not stop the portal from starting.
pub fn validation_warnings(config: &CardgateConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.auth.users.is_empty() {
        warnings.push("No users configured; credentials sign-in will reject everyone".to_string());
    }

    if config.auth.secret().is_some_and(|secret| secret.len() < MIN_SECRET_LEN) {
        warnings.push(format!(
            "auth.secret is shorter than {} bytes",
            MIN_SECRET_LEN
        ));
    }

    if config.gate.blocked_roles.is_empty() {
        warnings.push("gate.blocked_roles is empty; every role can reach the portal".to_string());
    }

    if !config.auth.secure_cookies
        && config
            .auth
            .cookie_names
            .iter()
            .all(|name| name.starts_with(SECURE_PREFIX))
    {
        warnings.push(format!(
            "All cookie names use the {} prefix but auth.secure_cookies is off; sign-in cannot set a session",
            SECURE_PREFIX
        ));
    }

    warnings
}

/// The configuration as JSON with secrets masked.
fn redacted(config: &CardgateConfig) -> BinResult<Value> {
    let mut value = serde_json::to_value(config).context("serializing configuration")?;

    if let Some(secret) = value.pointer_mut("/auth/secret") {
        *secret = Value::from("***");
    }
    if let Some(Value::Array(users)) = value.pointer_mut("/auth/users") {
        for user in users {
            if let Some(password) = user.get_mut("password") {
                *password = Value::from("***");
            }
        }
    }

    Ok(value)
}

// =============================================================================
// Tests
// =============================================================================
