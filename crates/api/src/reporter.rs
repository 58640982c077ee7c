//! Builds the informational payloads served by the API.
//!
//! Every call constructs a fresh payload; nothing is cached or mutated.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use condo_common::{HealthPayload, HealthStatus, RedirectPayload, ServiceState, StatusPayload};

/// Welcome message shown at the API root.
pub const WELCOME_MESSAGE: &str = "¡Bienvenido a la API del Sistema de Gestión de Condominios!";

/// Where the login stub points clients for real authentication.
pub const LOGIN_REDIRECT: &str = "/api/usuarios/login/";

const DOCUMENTATION_LINKS: &[(&str, &str)] = &[
    ("swagger_ui", "/api/schema/swagger-ui/"),
    ("redoc", "/api/schema/redoc/"),
    ("openapi_schema", "/api/schema/"),
];

const PRIMARY_ENDPOINTS: &[(&str, &str)] = &[
    ("autenticacion", "/api/login/"),
    ("registro", "/api/registro/"),
    ("usuarios", "/api/usuarios/"),
    ("seguridad", "/api/seguridad/"),
    ("condominio", "/api/condominio/"),
    ("finanzas", "/api/finanzas/"),
    ("mantenimiento", "/api/mantenimiento/"),
    ("notificaciones", "/api/notificaciones/"),
];

const TECHNICAL_INFO: &[(&str, &str)] = &[
    ("framework", "axum"),
    ("runtime", "tokio"),
    ("autenticacion", "Token Authentication"),
    ("documentacion", "OpenAPI 3.0"),
];

/// Source of the current time for payload timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Stateless producer of the welcome, health and login-stub payloads.
#[derive(Debug, Clone, Default)]
pub struct StatusReporter<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> StatusReporter<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Payload for `GET /api/`.
    pub fn welcome(&self) -> StatusPayload {
        StatusPayload {
            message: WELCOME_MESSAGE.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            date: self.clock.now().format("%Y-%m-%d").to_string(),
            state: ServiceState::Operational,
            documentation_links: to_map(DOCUMENTATION_LINKS),
            primary_endpoints: to_map(PRIMARY_ENDPOINTS),
            technical_info: to_map(TECHNICAL_INFO),
        }
    }

    /// Payload for `GET /api/health/`. The process answering is the check.
    pub fn health(&self) -> HealthPayload {
        HealthPayload {
            status: HealthStatus::Healthy,
            message: "Server is running".to_string(),
            timestamp: self
                .clock
                .now()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Payload for the login stub.
    ///
    /// This performs no authentication whatsoever: whatever the caller
    /// sends, the answer is the same redirect hint. It is not a security
    /// boundary.
    pub fn login_stub(&self) -> RedirectPayload {
        RedirectPayload {
            message: "Custom login endpoint".to_string(),
            redirect: LOGIN_REDIRECT.to_string(),
        }
    }
}

fn to_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
