//! Probe configuration.
//!
//! Defaults target a backend on `http://127.0.0.1:8000`. Environment
//! variables override them:
//! - `CONDO_PROBE_BASE_URL`: server URL without the API prefix
//! - `CONDO_PROBE_TIMEOUT_SECS`: per-request timeout
//! - `CONDO_PROBE_CREDENTIALS`: `label:username:password` entries, comma-separated

use std::time::Duration;

use serde::Serialize;

use crate::error::{ProbeError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Protected listings swept by the connectivity check, relative to the API prefix.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "/usuarios/",
    "/condominio/propiedades/",
    "/finanzas/pagos/",
    "/seguridad/visitas/",
    "/mantenimiento/solicitudes/",
];

/// Origins of the React dev servers (CRA and Vite).
pub const DEFAULT_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

/// One login candidate. Tried in the order configured.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub label: String,
    pub username: String,
    #[serde(skip)]
    pub password: String,
}

impl Credential {
    pub fn new(
        label: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("label", &self.label)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn default_credentials() -> Vec<Credential> {
    vec![
        Credential::new("admin", "admin", "admin123"),
        Credential::new("residente1", "residente1", "isaelOrtiz2"),
        Credential::new("seguridad1", "seguridad1", "guardia123"),
    ]
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Scheme, host and port of the backend.
    pub base_url: String,
    /// Prefix every API route lives under.
    pub api_prefix: String,
    pub timeout: Duration,
    pub credentials: Vec<Credential>,
    /// Token login route, relative to the API prefix.
    pub auth_login_path: String,
    pub endpoints: Vec<String>,
    pub origins: Vec<String>,
    /// Route the CORS check targets, relative to `base_url`.
    pub cors_login_path: String,
    /// Body sent with the CORS check's real POST.
    pub cors_test_credential: Credential,
    pub admin_path: String,
    pub docs_path: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: "/api".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            credentials: default_credentials(),
            auth_login_path: "/login/".to_string(),
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| (*e).to_string()).collect(),
            origins: DEFAULT_ORIGINS.iter().map(|o| (*o).to_string()).collect(),
            cors_login_path: "/api/usuarios/login/".to_string(),
            cors_test_credential: Credential::new("admin", "admin", "admin123"),
            admin_path: "/admin/".to_string(),
            docs_path: "/api/schema/swagger-ui/".to_string(),
        }
    }
}

impl ProbeConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("CONDO_PROBE_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(raw) = std::env::var("CONDO_PROBE_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ProbeError::Config(format!("CONDO_PROBE_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config.timeout = timeout_from_secs(secs)?;
        }
        if let Ok(raw) = std::env::var("CONDO_PROBE_CREDENTIALS") {
            config.credentials = parse_credentials(&raw)?;
        }

        Ok(config)
    }

    /// Base URL the API routes hang off, e.g. `http://127.0.0.1:8000/api`.
    pub fn api_base(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/')
        )
    }

    /// Absolute URL for a path relative to `base_url`.
    pub fn server_url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Absolute URL for a path relative to the API prefix.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base(), path)
    }
}

/// Per-request timeout; zero would fail every request before it is sent.
pub fn timeout_from_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(ProbeError::Config(
            "timeout must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Joins a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Parses `label:username:password` entries separated by commas.
///
/// The password may itself contain `:`; label and username may not.
pub fn parse_credentials(raw: &str) -> Result<Vec<Credential>> {
    let credentials = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(label), Some(username), Some(password))
                    if !label.is_empty() && !username.is_empty() =>
                {
                    Ok(Credential::new(label, username, password))
                }
                _ => Err(ProbeError::Config(format!(
                    "credential entry must be label:username:password, got {entry:?}"
                ))),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if credentials.is_empty() {
        return Err(ProbeError::Config("no credentials configured".to_string()));
    }
    Ok(credentials)
}
