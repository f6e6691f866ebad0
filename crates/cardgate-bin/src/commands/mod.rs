// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod check;
mod run;
mod token;
mod validate;
mod version;

pub use check::{check, check_path, CheckReport};
pub use run::run;
pub use token::{mint_token, token};
pub use validate::{validate, validation_warnings};
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run => run::run(&cli).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Check(args) => check::check(&cli, args).await,
        Commands::Token(args) => token::token(&cli, args),
        Commands::Version => version::version(&cli),
    }
}
