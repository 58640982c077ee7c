//! CORS verification against stub backends with different CORS policies.

mod common;

use axum::Json;
use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post};
use common::{config_for, refused_url, serve};
use condo_probe::{CorsVerdict, CorsVerifier, run_cors};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const REACT: &str = "http://localhost:3000";
const VITE: &str = "http://localhost:5173";

async fn spawn_with_cors(cors: CorsLayer) -> String {
    let router = Router::new()
        .route("/api/", get(|| async { Json(json!({ "ok": true })) }))
        .route(
            "/api/usuarios/login/",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid credentials" })),
                )
            }),
        )
        .layer(cors);
    serve(router).await
}

fn origins() -> Vec<String> {
    vec![REACT.to_string(), VITE.to_string()]
}

#[tokio::test]
async fn listed_origin_is_ok_and_unlisted_is_a_problem() {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([HeaderValue::from_static(REACT)]))
        .allow_methods(Any)
        .allow_headers(Any);
    let base = spawn_with_cors(cors).await;
    let config = config_for(&base);
    let http = reqwest::Client::new();

    let results = CorsVerifier::new(&http, &config)
        .verify_cors(&origins(), "/api/usuarios/login/")
        .await;

    assert_eq!(results.len(), 2);

    let react = &results[0];
    assert_eq!(react.origin, REACT);
    assert_eq!(react.preflight.http_status, Some(200));
    assert_eq!(react.preflight.verdict, CorsVerdict::Ok);
    assert!(
        react
            .preflight
            .access_control_headers
            .iter()
            .any(|(name, value)| name == "access-control-allow-origin" && value == REACT)
    );
    assert_eq!(react.allowed_origin_header.as_deref(), Some(REACT));
    assert_eq!(react.verdict, CorsVerdict::Ok);
    assert_eq!(react.http_status, Some(400));
    assert!(react.response_excerpt.as_deref().unwrap().contains("invalid credentials"));

    let vite = &results[1];
    assert_eq!(vite.preflight.http_status, Some(200));
    assert_eq!(vite.preflight.verdict, CorsVerdict::Problem);
    assert_eq!(vite.allowed_origin_header, None);
    assert_eq!(vite.verdict, CorsVerdict::Problem);
    assert!(vite.detail.as_deref().unwrap().contains("absent"));
}

#[tokio::test]
async fn wildcard_policy_is_open() {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let base = spawn_with_cors(cors).await;
    let config = config_for(&base);
    let http = reqwest::Client::new();

    let results = CorsVerifier::new(&http, &config)
        .verify_cors(&origins(), "/api/usuarios/login/")
        .await;

    assert!(results.iter().all(|r| r.verdict == CorsVerdict::OpenWildcard));
    assert!(
        results
            .iter()
            .all(|r| r.preflight.verdict == CorsVerdict::OpenWildcard)
    );
}

#[tokio::test]
async fn refused_connection_is_captured_per_origin() {
    let config = config_for(&refused_url().await);

    let report = run_cors(&config).await.unwrap();

    assert_eq!(report.origins.len(), 2);
    for result in &report.origins {
        assert_eq!(result.verdict, CorsVerdict::Error);
        assert_eq!(result.preflight.verdict, CorsVerdict::Error);
        assert!(result.http_status.is_none());
    }
    assert_eq!(report.reachability.len(), 2);
    assert!(report.reachability.iter().all(|p| p.error.is_some()));
}

#[tokio::test]
async fn reachability_reports_status_without_judging() {
    let cors = CorsLayer::new().allow_origin(Any);
    let base = spawn_with_cors(cors).await;
    let config = config_for(&base);

    let report = run_cors(&config).await.unwrap();

    let statuses: Vec<Option<u16>> = report.reachability.iter().map(|p| p.http_status).collect();
    assert_eq!(statuses, [Some(200), Some(404)]);
}
