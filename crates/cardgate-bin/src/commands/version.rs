// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("cardgate - route-access gate for the Camp Card admin portal");
    println!();
    println!("Version Information:");
    println!("  cardgate-bin:    {}", crate::VERSION);
    println!("  cardgate-core:   {}", cardgate_core::VERSION);
    println!("  cardgate-api:    {}", cardgate_api::VERSION);
    println!("  cardgate-config: {}", cardgate_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
