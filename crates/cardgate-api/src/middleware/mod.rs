// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware for the portal server.
//!
//! - [`GateMiddleware`]: route-access gate in front of every portal route

mod gate;

pub use gate::{redirect_response, GateLayer, GateMiddleware};
