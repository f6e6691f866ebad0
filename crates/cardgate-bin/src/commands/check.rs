// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check` command.
//!
//! Runs one path through the same engine the server uses, without serving
//! anything.

use anyhow::Context;
use cardgate_api::JwtVerifier;
use cardgate_config::CardgateConfig;
use cardgate_core::{AccessEngine, Claims, Credentials, Evaluation, Outcome, RouteClass};
use serde::Serialize;

use crate::cli::{CheckArgs, Cli, OutputFormat};
use crate::error::{BinError, BinResult};
use crate::runtime::{jwt_config, load_lenient};

/// What the gate does with one request.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Request path.
    pub path: String,
    /// Query string, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Path classification.
    pub class: RouteClass,
    /// Role of the session, if there is one.
    pub role: Option<String>,
    /// Subject of the session, if there is one.
    pub user_id: Option<String>,
    /// The decision.
    pub outcome: Outcome,
    /// Redirect location, when the outcome redirects.
    pub location: Option<String>,
}

/// Executes the `check` command.
pub async fn check(cli: &Cli, args: CheckArgs) -> BinResult<()> {
    let config = load_lenient(&cli.config)?;
    let report = check_path(&config, &args).await?;

    match args.format {
        OutputFormat::Text => {
            println!("Path:     {}", report.path);
            if let Some(ref query) = report.query {
                println!("Query:    {}", query);
            }
            println!("Class:    {}", report.class);
            match (&report.role, &report.user_id) {
                (Some(role), Some(user_id)) => println!("Session:  {} ({})", role, user_id),
                _ => println!("Session:  none"),
            }
            println!("Outcome:  {}", report.outcome.label());
            if let Some(ref location) = report.location {
                println!("Location: {}", location);
            }
        }
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&report).context("rendering report")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Evaluates `args.path` against the gate described by `config`.
///
/// `--role` stands in for a valid session with that role; `--token` is
/// verified with the configured secret exactly as the server would.
pub async fn check_path(config: &CardgateConfig, args: &CheckArgs) -> BinResult<CheckReport> {
    if !args.path.starts_with('/') {
        return Err(BinError::config(format!(
            "Path must start with '/': {}",
            args.path
        )));
    }

    let (path, query) = match args.path.split_once('?') {
        Some((path, query)) => (path, Some(query).filter(|q| !q.is_empty())),
        None => (args.path.as_str(), None),
    };

    let engine = AccessEngine::new(config.policy()?);

    let evaluation = match (&args.role, &args.token) {
        (_, Some(token)) => {
            let verifier = JwtVerifier::new(&jwt_config(&config.auth)?)?;
            engine
                .evaluate(&verifier, path, query, &Credentials::from_bearer(token))
                .await
        }
        (Some(role), None) => {
            let claims = Claims::builder("cli").role(role.as_str()).build();
            let outcome = engine.decide_path(path, query, Some(&claims));
            Evaluation {
                class: engine.policy().classify(path),
                claims: Some(claims),
                outcome,
            }
        }
        (None, None) => {
            let outcome = engine.decide_path(path, query, None);
            Evaluation {
                class: engine.policy().classify(path),
                claims: None,
                outcome,
            }
        }
    };

    Ok(CheckReport {
        path: path.to_string(),
        query: query.map(str::to_string),
        class: evaluation.class,
        role: evaluation.claims.as_ref().map(|c| c.role().to_string()),
        user_id: evaluation.claims.as_ref().map(|c| c.user_id().to_string()),
        location: evaluation.outcome.location(),
        outcome: evaluation.outcome,
    })
}

// =============================================================================
// Tests
// =============================================================================
