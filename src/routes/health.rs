//! Health check endpoint for container orchestration.
//!
//! Runs every registered probe and reports the aggregate. Healthy and Degraded
//! reports are served with 200 OK; an Unhealthy report keeps the same body
//! shape but is served with 503 so load balancers take the instance out of
//! rotation.

use axum::{extract::State, http::StatusCode, Json};
use tracing::instrument;

use crate::health::{HealthReport, HealthStatus};
use crate::state::AppState;

/// Health check handler.
#[instrument(name = "health::health", skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.check_health().await;
    (status_code(report.status), Json(report))
}

fn status_code(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}
