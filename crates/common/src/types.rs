use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Operational state advertised by the welcome payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceState {
    #[serde(rename = "Operativo")]
    Operational,
    #[serde(rename = "Degradado")]
    Degraded,
    #[serde(rename = "Caido")]
    Down,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ServiceState::Operational => "Operativo",
            ServiceState::Degraded => "Degradado",
            ServiceState::Down => "Caido",
        };
        f.write_str(label)
    }
}

/// Descriptive payload served at the API root.
///
/// Field names on the wire follow the keys the existing frontend already
/// consumes, so the Rust names are mapped with `serde(rename)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(rename = "mensaje")]
    pub message: String,
    pub version: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "estado")]
    pub state: ServiceState,
    #[serde(rename = "documentacion")]
    pub documentation_links: BTreeMap<String, String>,
    #[serde(rename = "endpoints_principales")]
    pub primary_endpoints: BTreeMap<String, String>,
    #[serde(rename = "informacion_tecnica")]
    pub technical_info: BTreeMap<String, String>,
}

/// Liveness verdict reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPayload {
    pub status: HealthStatus,
    pub message: String,
    pub timestamp: String,
}

/// Static hint returned by the login stub. Carries no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectPayload {
    pub message: String,
    pub redirect: String,
}

/// Opaque token handed out by the backend's real login endpoint.
///
/// `Debug` never prints the secret; use [`SessionToken::preview`] for logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Number of leading characters shown by [`SessionToken::preview`].
    pub const PREVIEW_LEN: usize = 20;

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first [`Self::PREVIEW_LEN`] characters followed by `...`.
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(Self::PREVIEW_LEN).collect();
        format!("{head}...")
    }

    /// Value for the `Authorization` header, in the `Token <t>` scheme.
    pub fn authorization_value(&self) -> String {
        format!("Token {}", self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionToken").field(&self.preview()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_state_uses_wire_labels() {
        let json = serde_json::to_string(&ServiceState::Operational).unwrap();
        assert_eq!(json, "\"Operativo\"");
        assert_eq!(ServiceState::Degraded.to_string(), "Degradado");
    }

    #[test]
    fn health_status_is_lowercase() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }

    #[test]
    fn status_payload_deserializes_from_wire_keys() {
        let json = serde_json::json!({
            "mensaje": "hola",
            "version": "1.0.0",
            "fecha": "2025-09-30",
            "estado": "Operativo",
            "documentacion": { "redoc": "/api/schema/redoc/" },
            "endpoints_principales": { "usuarios": "/api/usuarios/" },
            "informacion_tecnica": {}
        });
        let payload: StatusPayload = serde_json::from_value(json).unwrap();
        assert_eq!(payload.state, ServiceState::Operational);
        assert_eq!(payload.date, "2025-09-30");
        assert_eq!(payload.primary_endpoints["usuarios"], "/api/usuarios/");
    }

    #[test]
    fn session_token_preview_truncates() {
        let token = SessionToken::new("0123456789abcdefghijKLMNOP");
        assert_eq!(token.preview(), "0123456789abcdefghij...");
        assert_eq!(
            token.authorization_value(),
            "Token 0123456789abcdefghijKLMNOP"
        );
    }

    #[test]
    fn session_token_debug_hides_secret() {
        let token = SessionToken::new("0123456789abcdefghijSECRET");
        let debug = format!("{token:?}");
        assert!(!debug.contains("SECRET"));
    }

    #[test]
    fn session_token_deserializes_transparently() {
        let token: SessionToken = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(token.as_str(), "abc");
    }
}
