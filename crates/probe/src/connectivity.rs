//! Reachability of the API root and the protected listings.

use condo_common::{SessionToken, StatusPayload};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{AuthFailure, AuthProbe, Authenticated};
use crate::client::{build_http_client, read_body};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};

/// Outcome of `GET {api}/`.
#[derive(Debug, Clone, Serialize)]
pub struct RootCheck {
    pub url: String,
    pub http_status: u16,
    /// Present when the root served a recognizable welcome payload.
    pub version: Option<String>,
    pub state: Option<String>,
}

/// One probed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointCheckResult {
    pub path: String,
    pub reachable: bool,
    pub item_count: Option<usize>,
    /// `None` when no response arrived.
    pub http_status: Option<u16>,
    pub error: Option<String>,
}

/// Results of an endpoint sweep, in the order the endpoints were given.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub results: Vec<EndpointCheckResult>,
    pub success_count: usize,
    pub total_count: usize,
}

impl EndpointReport {
    pub fn from_results(results: Vec<EndpointCheckResult>) -> Self {
        let success_count = results.iter().filter(|r| r.reachable).count();
        let total_count = results.len();
        Self {
            results,
            success_count,
            total_count,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.success_count == self.total_count
    }
}

/// Number of items in a listing body.
///
/// A mapping counts its `results` sequence; a bare sequence counts its
/// elements. Anything else, including a mapping whose `results` is not a
/// sequence or that has no `results` at all, has no item count.
pub fn count_items(body: &Value) -> Option<usize> {
    match body {
        Value::Object(map) => map.get("results").and_then(Value::as_array).map(Vec::len),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

pub struct ConnectivityVerifier<'a> {
    http: &'a reqwest::Client,
    config: &'a ProbeConfig,
}

impl<'a> ConnectivityVerifier<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a ProbeConfig) -> Self {
        Self { http, config }
    }

    /// Basic reachability of the API root. Anything but a 200 is an error.
    #[tracing::instrument(skip(self))]
    pub async fn check_root(&self) -> Result<RootCheck> {
        let url = self.config.api_url("/");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ProbeError::transport(&url, source))?;

        let status = response.status();
        let body = read_body(&url, response).await?;
        if status != StatusCode::OK {
            return Err(ProbeError::UnexpectedStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let welcome = serde_json::from_str::<StatusPayload>(&body).ok();
        tracing::info!(%url, recognized = welcome.is_some(), "API root reachable");
        Ok(RootCheck {
            url,
            http_status: status.as_u16(),
            version: welcome.as_ref().map(|w| w.version.clone()),
            state: welcome.map(|w| w.state.to_string()),
        })
    }

    /// Probes every endpoint in order with the session token.
    ///
    /// Never stops early: each endpoint yields exactly one result.
    pub async fn verify(&self, token: &SessionToken, endpoints: &[String]) -> EndpointReport {
        let mut results = Vec::with_capacity(endpoints.len());
        for path in endpoints {
            results.push(self.check_endpoint(token, path).await);
        }
        EndpointReport::from_results(results)
    }

    #[tracing::instrument(skip(self, token))]
    pub async fn check_endpoint(&self, token: &SessionToken, path: &str) -> EndpointCheckResult {
        let result = match self.fetch_listing(token, path).await {
            Ok(body) => EndpointCheckResult {
                path: path.to_string(),
                reachable: true,
                item_count: count_items(&body),
                http_status: Some(StatusCode::OK.as_u16()),
                error: None,
            },
            Err(err) => {
                let http_status = match &err {
                    ProbeError::UnexpectedStatus { status, .. } => Some(*status),
                    ProbeError::MalformedResponse { .. } => Some(StatusCode::OK.as_u16()),
                    _ => None,
                };
                EndpointCheckResult {
                    path: path.to_string(),
                    reachable: false,
                    item_count: None,
                    http_status,
                    error: Some(err.to_string()),
                }
            }
        };

        if result.reachable {
            tracing::info!(items = ?result.item_count, "endpoint reachable");
        } else {
            tracing::warn!(status = ?result.http_status, error = ?result.error, "endpoint unreachable");
        }
        result
    }

    async fn fetch_listing(&self, token: &SessionToken, path: &str) -> Result<Value> {
        let url = self.config.api_url(path);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, token.authorization_value())
            .send()
            .await
            .map_err(|source| ProbeError::transport(&url, source))?;

        let status = response.status();
        let body = read_body(&url, response).await?;
        if status != StatusCode::OK {
            return Err(ProbeError::UnexpectedStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ProbeError::MalformedResponse {
            url,
            reason: e.to_string(),
        })
    }
}

/// How a full connectivity run ended.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConnectivityOutcome {
    /// The API root could not be reached; nothing else was attempted.
    BaseUnreachable { url: String, error: String },
    /// No credential worked; no endpoint was probed.
    AuthenticationFailed {
        root: RootCheck,
        failure: AuthFailure,
    },
    Completed {
        root: RootCheck,
        auth: Authenticated,
        report: EndpointReport,
    },
}

impl ConnectivityOutcome {
    /// 1 when a fatal precondition failed, 0 otherwise (even with
    /// individual endpoint failures).
    pub fn exit_code(&self) -> i32 {
        match self {
            ConnectivityOutcome::BaseUnreachable { .. }
            | ConnectivityOutcome::AuthenticationFailed { .. } => 1,
            ConnectivityOutcome::Completed { .. } => 0,
        }
    }

    /// The endpoint sweep, if the run got that far.
    pub fn report(&self) -> Option<&EndpointReport> {
        match self {
            ConnectivityOutcome::Completed { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Root check, then login, then the endpoint sweep.
///
/// The first two steps are hard stops. Only building the HTTP client can
/// make this return `Err`.
pub async fn run_connectivity(config: &ProbeConfig) -> Result<ConnectivityOutcome> {
    let http = build_http_client(config.timeout)?;
    let verifier = ConnectivityVerifier::new(&http, config);

    let root = match verifier.check_root().await {
        Ok(root) => root,
        Err(err) => {
            tracing::error!(error = %err, "basic connectivity failed");
            return Ok(ConnectivityOutcome::BaseUnreachable {
                url: config.api_url("/"),
                error: err.to_string(),
            });
        }
    };

    let auth = match AuthProbe::new(&http, config)
        .authenticate(&config.credentials)
        .await
    {
        Ok(auth) => auth,
        Err(failure) => {
            tracing::error!(tried = failure.tried_count, "no credential authenticated");
            return Ok(ConnectivityOutcome::AuthenticationFailed { root, failure });
        }
    };

    let report = verifier.verify(&auth.token, &config.endpoints).await;
    tracing::info!(
        succeeded = report.success_count,
        total = report.total_count,
        "endpoint sweep finished"
    );
    Ok(ConnectivityOutcome::Completed { root, auth, report })
}
