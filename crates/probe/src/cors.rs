//! Cross-origin checks as a browser frontend would trigger them.

use reqwest::StatusCode;
use reqwest::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD,
    HeaderMap, ORIGIN,
};
use serde::Serialize;

use crate::client::{build_http_client, excerpt, read_body};
use crate::config::{Credential, ProbeConfig};
use crate::error::{ProbeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsVerdict {
    /// The origin is explicitly allowed.
    Ok,
    /// Any origin is allowed (`*`).
    OpenWildcard,
    /// The header is absent or names another origin.
    Problem,
    /// No response arrived.
    Error,
}

/// Verdict for an `Access-Control-Allow-Origin` value seen by `origin`.
pub fn classify_allow_origin(origin: &str, allowed: Option<&str>) -> CorsVerdict {
    match allowed {
        Some(value) if value == origin => CorsVerdict::Ok,
        Some("*") => CorsVerdict::OpenWildcard,
        _ => CorsVerdict::Problem,
    }
}

/// Verdict for a preflight answer: a 200 only counts when it also carries
/// an allow-origin header covering `origin`.
pub fn classify_preflight(
    origin: &str,
    status: StatusCode,
    allowed: Option<&str>,
) -> CorsVerdict {
    if status != StatusCode::OK {
        return CorsVerdict::Problem;
    }
    classify_allow_origin(origin, allowed)
}

/// Response headers whose name mentions `access-control`, in response order.
pub fn access_control_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(name, _)| name.as_str().to_ascii_lowercase().contains("access-control"))
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PreflightResult {
    pub http_status: Option<u16>,
    pub verdict: CorsVerdict,
    pub access_control_headers: Vec<(String, String)>,
    pub error: Option<String>,
}

/// Preflight and real request outcomes for one simulated origin.
#[derive(Debug, Clone, Serialize)]
pub struct CorsCheckResult {
    pub origin: String,
    pub preflight: PreflightResult,
    pub allowed_origin_header: Option<String>,
    pub http_status: Option<u16>,
    pub verdict: CorsVerdict,
    pub detail: Option<String>,
    /// Start of the body when the real request got a 4xx/5xx.
    pub response_excerpt: Option<String>,
}

/// Informational GET; never affects a verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ReachabilityProbe {
    pub label: String,
    pub url: String,
    pub http_status: Option<u16>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorsReport {
    pub origins: Vec<CorsCheckResult>,
    pub reachability: Vec<ReachabilityProbe>,
}

pub struct CorsVerifier<'a> {
    http: &'a reqwest::Client,
    config: &'a ProbeConfig,
}

impl<'a> CorsVerifier<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a ProbeConfig) -> Self {
        Self { http, config }
    }

    /// Checks every origin in order. Failures are captured per origin.
    pub async fn verify_cors(&self, origins: &[String], login_path: &str) -> Vec<CorsCheckResult> {
        let url = self.config.server_url(login_path);
        let mut results = Vec::with_capacity(origins.len());
        for origin in origins {
            results.push(self.check_origin(origin, &url).await);
        }
        results
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_origin(&self, origin: &str, url: &str) -> CorsCheckResult {
        let preflight = self.preflight(origin, url).await;
        let credential = &self.config.cors_test_credential;

        let result = match self.post_with_origin(origin, url, credential).await {
            Ok((status, headers, body)) => {
                let allowed = headers
                    .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
                let verdict = classify_allow_origin(origin, allowed.as_deref());
                let detail = (verdict == CorsVerdict::Problem).then(|| {
                    ProbeError::CorsMismatch {
                        origin: origin.to_string(),
                        allowed: allowed.clone(),
                    }
                    .to_string()
                });
                let response_excerpt =
                    (status.is_client_error() || status.is_server_error()).then(|| excerpt(&body));
                CorsCheckResult {
                    origin: origin.to_string(),
                    preflight,
                    allowed_origin_header: allowed,
                    http_status: Some(status.as_u16()),
                    verdict,
                    detail,
                    response_excerpt,
                }
            }
            Err(err) => CorsCheckResult {
                origin: origin.to_string(),
                preflight,
                allowed_origin_header: None,
                http_status: None,
                verdict: CorsVerdict::Error,
                detail: Some(err.to_string()),
                response_excerpt: None,
            },
        };

        tracing::info!(verdict = ?result.verdict, status = ?result.http_status, "origin checked");
        result
    }

    async fn preflight(&self, origin: &str, url: &str) -> PreflightResult {
        let sent = self
            .http
            .request(reqwest::Method::OPTIONS, url)
            .header(ORIGIN, origin)
            .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(ACCESS_CONTROL_REQUEST_HEADERS, "Content-Type")
            .send()
            .await;

        match sent {
            Ok(response) => {
                let status = response.status();
                let allowed = response
                    .headers()
                    .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
                PreflightResult {
                    http_status: Some(status.as_u16()),
                    verdict: classify_preflight(origin, status, allowed.as_deref()),
                    access_control_headers: access_control_headers(response.headers()),
                    error: None,
                }
            }
            Err(source) => {
                let err = ProbeError::transport(url, source);
                tracing::warn!(error = %err, "preflight failed");
                PreflightResult {
                    http_status: None,
                    verdict: CorsVerdict::Error,
                    access_control_headers: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    async fn post_with_origin(
        &self,
        origin: &str,
        url: &str,
        credential: &Credential,
    ) -> Result<(StatusCode, HeaderMap, String)> {
        let response = self
            .http
            .post(url)
            .header(ORIGIN, origin)
            .json(&serde_json::json!({
                "username": credential.username,
                "password": credential.password,
            }))
            .send()
            .await
            .map_err(|source| ProbeError::transport(url, source))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = read_body(url, response).await?;
        Ok((status, headers, body))
    }

    /// Plain GETs of the API root and the admin root.
    pub async fn reachability(&self) -> Vec<ReachabilityProbe> {
        let targets = [
            ("API root", self.config.api_url("/")),
            ("admin", self.config.server_url(&self.config.admin_path)),
        ];

        let mut probes = Vec::with_capacity(targets.len());
        for (label, url) in targets {
            let probe = match self.http.get(&url).send().await {
                Ok(response) => ReachabilityProbe {
                    label: label.to_string(),
                    http_status: Some(response.status().as_u16()),
                    url,
                    error: None,
                },
                Err(source) => {
                    let error = ProbeError::transport(&url, source).to_string();
                    ReachabilityProbe {
                        label: label.to_string(),
                        url,
                        http_status: None,
                        error: Some(error),
                    }
                }
            };
            probes.push(probe);
        }
        probes
    }
}

/// Every configured origin, then the informational reachability probes.
pub async fn run_cors(config: &ProbeConfig) -> Result<CorsReport> {
    let http = build_http_client(config.timeout)?;
    let verifier = CorsVerifier::new(&http, config);

    let origins = verifier
        .verify_cors(&config.origins, &config.cors_login_path)
        .await;
    let reachability = verifier.reachability().await;
    Ok(CorsReport {
        origins,
        reachability,
    })
}
