//! API root: welcome and discovery payload.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use condo_common::StatusPayload;

use crate::reporter::{Clock, StatusReporter};

/// GET /api/: returns the welcome payload with documentation and endpoint links.
pub async fn get<C: Clock>(
    State(reporter): State<Arc<StatusReporter<C>>>,
) -> Json<StatusPayload> {
    metrics::counter!("status_requests_total", "route" => "welcome").increment(1);
    Json(reporter.welcome())
}
