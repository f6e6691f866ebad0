// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handler.

use axum::{extract::State, response::IntoResponse, Json};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Liveness check. Served outside the gate.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::healthy(state.uptime_secs()))
}
