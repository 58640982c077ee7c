//! Stub backend for probe integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get, post};
use condo_probe::{Credential, ProbeConfig};
use serde_json::{Value, json};

pub const GOOD_TOKEN: &str = "token-good-0123456789abcdef";

/// A stub backend and the traffic it has seen.
pub struct Backend {
    pub base_url: String,
    pub login_attempts: Arc<Mutex<Vec<String>>>,
    pub endpoint_hits: Arc<AtomicUsize>,
}

impl Backend {
    pub fn attempts(&self) -> Vec<String> {
        self.login_attempts.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.endpoint_hits.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> ProbeConfig {
        config_for(&self.base_url)
    }
}

pub fn config_for(base_url: &str) -> ProbeConfig {
    ProbeConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        ..ProbeConfig::default()
    }
}

pub fn cred(username: &str) -> Credential {
    Credential::new(format!("{username}-label"), username, "secret")
}

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A URL nothing listens on.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Login behavior keyed on the username:
/// `good*` gets a token, `weird` gets a non-JSON 200, `tokenless` a 200
/// without a token, everyone else a 400.
fn login_route(attempts: Arc<Mutex<Vec<String>>>) -> MethodRouter {
    post(move |Json(body): Json<Value>| {
        let attempts = attempts.clone();
        async move {
            let username = body["username"].as_str().unwrap_or_default().to_string();
            attempts.lock().unwrap().push(username.clone());
            match username.as_str() {
                "good" => Json(json!({ "token": GOOD_TOKEN })).into_response(),
                u if u.starts_with("good") => {
                    Json(json!({ "token": format!("token-{u}") })).into_response()
                }
                "weird" => (StatusCode::OK, "<html>not json</html>").into_response(),
                "tokenless" => Json(json!({ "user": "tokenless" })).into_response(),
                _ => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "non_field_errors": ["Unable to log in"] })),
                )
                    .into_response(),
            }
        }
    })
}

fn listing(body: Value, fail: bool, hits: Arc<AtomicUsize>) -> MethodRouter {
    get(move |headers: HeaderMap| {
        let body = body.clone();
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            let expected = format!("Token {GOOD_TOKEN}");
            let authorized = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == expected);
            if !authorized {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "detail": "Authentication credentials were not provided." })),
                )
                    .into_response();
            }
            if fail {
                return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
            }
            Json(body).into_response()
        }
    })
}

fn welcome() -> Value {
    json!({
        "mensaje": "hola",
        "version": "1.0.0",
        "fecha": "2025-09-30",
        "estado": "Operativo",
        "documentacion": { "swagger_ui": "/api/schema/swagger-ui/" },
        "endpoints_principales": { "usuarios": "/api/usuarios/" },
        "informacion_tecnica": {}
    })
}

/// Starts a backend whose listings in `failing` answer 500.
pub async fn spawn_backend(failing: &[&str]) -> Backend {
    let login_attempts = Arc::new(Mutex::new(Vec::new()));
    let endpoint_hits = Arc::new(AtomicUsize::new(0));

    let listings = [
        ("/usuarios/", json!({ "count": 3, "results": [1, 2, 3] })),
        ("/condominio/propiedades/", json!([{ "id": 1 }, { "id": 2 }])),
        ("/finanzas/pagos/", json!({ "results": [] })),
        ("/seguridad/visitas/", json!({ "results": {} })),
        ("/mantenimiento/solicitudes/", json!({ "detail": "ok" })),
    ];

    let mut router = Router::new()
        .route("/api/", get(|| async { Json(welcome()) }))
        .route("/api/login/", login_route(login_attempts.clone()));
    for (path, body) in listings {
        let fail = failing.contains(&path);
        router = router.route(
            &format!("/api{path}"),
            listing(body, fail, endpoint_hits.clone()),
        );
    }

    Backend {
        base_url: serve(router).await,
        login_attempts,
        endpoint_hits,
    }
}
