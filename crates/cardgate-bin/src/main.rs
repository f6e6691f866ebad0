// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `cardgate` entry point.

use cardgate_bin::{commands, error::report_error_and_exit, logging, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let (level, format) = logging::settings_for(&cli);
    logging::init_logging(&level, format);

    if let Err(e) = commands::execute(cli).await {
        report_error_and_exit(e);
    }
}
