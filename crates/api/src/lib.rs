//! Informational HTTP endpoints for the condominium-management backend.
//!
//! Serves the welcome/discovery payload, a health check and a login stub,
//! with CORS configured for the frontend dev servers, structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod reporter;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use reporter::{Clock, StatusReporter};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C: Clock + 'static>(
    reporter: Arc<StatusReporter<C>>,
    metrics_handle: PrometheusHandle,
    config: &Config,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/api/", get(routes::welcome::get::<C>))
        .route("/api/health/", get(routes::health::check::<C>))
        .route("/api/custom-login/", post(routes::login::stub::<C>))
        .with_state(reporter)
        .merge(metrics_router)
        .fallback(routes::not_found)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Builds the CORS policy from the configured origin list.
///
/// Entries that are not valid header values are skipped with a warning.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
