//! Login stub.
//!
//! Not an authentication endpoint. It ignores the request body and always
//! answers with a redirect hint to the real login route, which lives in the
//! user service.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use condo_common::RedirectPayload;

use crate::reporter::{Clock, StatusReporter};

/// POST /api/custom-login/: accepts any body, returns the static redirect.
pub async fn stub<C: Clock>(
    State(reporter): State<Arc<StatusReporter<C>>>,
    body: Bytes,
) -> Json<RedirectPayload> {
    metrics::counter!("status_requests_total", "route" => "login_stub").increment(1);
    tracing::debug!(body_len = body.len(), "login stub called, body ignored");
    Json(reporter.login_stub())
}
