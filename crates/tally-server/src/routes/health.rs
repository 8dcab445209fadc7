// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub use tally_server_api::HealthResponse;

use crate::api::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server and database are healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Liveness plus a database ping.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database_ok = match sqlx::query("SELECT 1").execute(&state.pool).await {
		Ok(_) => true,
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			false
		}
	};

	let (status, label) = if database_ok {
		(StatusCode::OK, "healthy")
	} else {
		(StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
	};

	let response = HealthResponse {
		status: label.to_string(),
		database: if database_ok { "ok" } else { "unavailable" }.to_string(),
		version: env!("CARGO_PKG_VERSION").to_string(),
	};

	(status, Json(response))
}
