// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Portal handlers.
//!
//! - [`health`]: liveness
//! - [`auth`]: session, credentials sign-in, sign-out
//! - [`pages`]: placeholder portal pages

mod auth;
mod health;
mod pages;

pub use auth::*;
pub use health::*;
pub use pages::*;
