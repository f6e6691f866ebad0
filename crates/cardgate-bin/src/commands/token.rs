// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `token` command.

use cardgate_api::JwtIssuer;
use cardgate_config::CardgateConfig;
use cardgate_core::Claims;
use tracing::info;

use crate::cli::{Cli, TokenArgs};
use crate::error::{BinError, BinResult};
use crate::runtime::{jwt_config, load_lenient};

/// Executes the `token` command: prints a signed session token.
///
/// The token works as a `next-auth.session-token` cookie value or a
/// `Bearer` credential against a gate sharing the same secret.
pub fn token(cli: &Cli, args: TokenArgs) -> BinResult<()> {
    let config = load_lenient(&cli.config)?;
    let token = mint_token(&config, &args)?;

    println!("{}", token);
    Ok(())
}

/// Signs a token for `args` with the configured secret.
pub fn mint_token(config: &CardgateConfig, args: &TokenArgs) -> BinResult<String> {
    if args.sub.trim().is_empty() {
        return Err(BinError::config("--sub cannot be empty"));
    }
    if args.role.trim().is_empty() {
        return Err(BinError::config("--role cannot be empty"));
    }

    let issuer = JwtIssuer::new(jwt_config(&config.auth)?)?;
    let expires_in = args.expires_in.unwrap_or(issuer.expiration_secs());

    let mut builder = Claims::builder(&args.sub)
        .role(args.role.as_str())
        .expires_in(expires_in);
    if let Some(ref name) = args.name {
        builder = builder.name(name);
    }
    if let Some(ref email) = args.email {
        builder = builder.email(email);
    }
    if let Some(ref council_id) = args.council_id {
        builder = builder.council_id(council_id);
    }
    let claims = builder.build();

    let token = issuer.issue(&claims)?;
    info!(
        user_id = %claims.user_id(),
        role = %claims.role(),
        expires_in,
        "Session token minted"
    );

    Ok(token)
}

// =============================================================================
// Tests
// =============================================================================
