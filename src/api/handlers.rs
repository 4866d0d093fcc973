//! HTTP endpoint handlers

use std::time::Duration;

use axum::{extract::Query, http::StatusCode, response::Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use super::responses::{HealthResponse, WorkResponse};

/// Longest simulated work a single request may ask for
pub const MAX_WORK_MS: u64 = 60_000;

#[derive(Debug, Deserialize)]
pub struct WorkParams {
    #[serde(default)]
    pub ms: u64,
}

/// Handle GET /health - Health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /work?ms=N - Hold the request open for N milliseconds
pub async fn work_handler(Query(params): Query<WorkParams>) -> Result<Json<WorkResponse>, StatusCode> {
    if params.ms > MAX_WORK_MS {
        warn!("Rejecting work request for {}ms (max {}ms)", params.ms, MAX_WORK_MS);
        return Err(StatusCode::BAD_REQUEST);
    }

    let started_at = Utc::now();
    debug!("Working for {}ms", params.ms);
    tokio::time::sleep(Duration::from_millis(params.ms)).await;

    Ok(Json(WorkResponse {
        waited_ms: params.ms,
        started_at,
        finished_at: Utc::now(),
    }))
}
