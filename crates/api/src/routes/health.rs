//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use condo_common::HealthPayload;

use crate::reporter::{Clock, StatusReporter};

/// GET /api/health/: returns server liveness.
pub async fn check<C: Clock>(
    State(reporter): State<Arc<StatusReporter<C>>>,
) -> Json<HealthPayload> {
    metrics::counter!("status_requests_total", "route" => "health").increment(1);
    Json(reporter.health())
}
