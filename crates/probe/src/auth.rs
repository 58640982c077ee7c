//! Token login against the backend, trying credentials in order.

use condo_common::SessionToken;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::{excerpt, read_body};
use crate::config::{Credential, ProbeConfig};
use crate::error::ProbeError;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<SessionToken>,
}

/// Record of one credential tried.
#[derive(Debug, Clone, Serialize)]
pub struct LoginAttempt {
    pub label: String,
    pub username: String,
    pub http_status: Option<u16>,
    /// `None` when this attempt produced the session token.
    pub error: Option<String>,
}

/// A working session, plus every attempt made to get it.
#[derive(Debug, Serialize)]
pub struct Authenticated {
    #[serde(skip)]
    pub token: SessionToken,
    pub token_preview: String,
    pub credential_label: String,
    pub attempts: Vec<LoginAttempt>,
}

/// Every configured credential was rejected.
#[derive(Debug, Serialize)]
pub struct AuthFailure {
    pub tried_count: usize,
    pub last_error: Option<String>,
    pub attempts: Vec<LoginAttempt>,
}

impl From<AuthFailure> for ProbeError {
    fn from(failure: AuthFailure) -> Self {
        ProbeError::Authentication {
            tried_count: failure.tried_count,
            last_error: failure
                .last_error
                .unwrap_or_else(|| "no credentials configured".to_string()),
        }
    }
}

/// Logs in with the first credential that works.
pub struct AuthProbe<'a> {
    http: &'a reqwest::Client,
    login_url: String,
}

impl<'a> AuthProbe<'a> {
    pub fn new(http: &'a reqwest::Client, config: &ProbeConfig) -> Self {
        Self {
            http,
            login_url: config.api_url(&config.auth_login_path),
        }
    }

    /// Tries `credentials` strictly in order and stops at the first one
    /// that yields a token. Later credentials are never sent.
    ///
    /// A rejected credential, a transport error or a 200 without a usable
    /// token only moves on to the next candidate.
    #[tracing::instrument(skip_all, fields(url = %self.login_url, candidates = credentials.len()))]
    pub async fn authenticate(
        &self,
        credentials: &[Credential],
    ) -> Result<Authenticated, AuthFailure> {
        let mut attempts = Vec::with_capacity(credentials.len());

        for credential in credentials {
            tracing::info!(label = %credential.label, username = %credential.username, "trying credential");

            match self.login(credential).await {
                Ok(token) => {
                    tracing::info!(label = %credential.label, token = %token.preview(), "login succeeded");
                    attempts.push(LoginAttempt {
                        label: credential.label.clone(),
                        username: credential.username.clone(),
                        http_status: Some(StatusCode::OK.as_u16()),
                        error: None,
                    });
                    return Ok(Authenticated {
                        token_preview: token.preview(),
                        token,
                        credential_label: credential.label.clone(),
                        attempts,
                    });
                }
                Err(err) => {
                    tracing::warn!(label = %credential.label, error = %err, "login failed");
                    attempts.push(LoginAttempt {
                        label: credential.label.clone(),
                        username: credential.username.clone(),
                        http_status: err.http_status().or(match &err {
                            ProbeError::MalformedResponse { .. } => Some(StatusCode::OK.as_u16()),
                            _ => None,
                        }),
                        error: Some(describe_login_error(&err)),
                    });
                }
            }
        }

        Err(AuthFailure {
            tried_count: attempts.len(),
            last_error: attempts.last().and_then(|a| a.error.clone()),
            attempts,
        })
    }

    async fn login(&self, credential: &Credential) -> Result<SessionToken, ProbeError> {
        let url = self.login_url.as_str();
        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                username: &credential.username,
                password: &credential.password,
            })
            .send()
            .await
            .map_err(|source| ProbeError::transport(url, source))?;

        let status = response.status();
        let body = read_body(url, response).await?;
        if status != StatusCode::OK {
            return Err(ProbeError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| ProbeError::MalformedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        parsed
            .token
            .filter(|token| !token.as_str().is_empty())
            .ok_or_else(|| ProbeError::MalformedResponse {
                url: url.to_string(),
                reason: "no `token` field in login response".to_string(),
            })
    }
}

/// Status plus body for rejected logins, the error text otherwise.
fn describe_login_error(err: &ProbeError) -> String {
    match err {
        ProbeError::UnexpectedStatus { status, body, .. } => {
            format!("{status} - {}", excerpt(body))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_converts_to_authentication_error() {
        let failure = AuthFailure {
            tried_count: 3,
            last_error: Some("401 - bad".to_string()),
            attempts: Vec::new(),
        };
        let err = ProbeError::from(failure);
        assert!(matches!(
            err,
            ProbeError::Authentication { tried_count: 3, .. }
        ));
    }

    #[test]
    fn empty_failure_names_missing_credentials() {
        let failure = AuthFailure {
            tried_count: 0,
            last_error: None,
            attempts: Vec::new(),
        };
        assert!(
            ProbeError::from(failure)
                .to_string()
                .contains("no credentials configured")
        );
    }

    #[test]
    fn rejected_login_is_described_with_status_and_body() {
        let err = ProbeError::UnexpectedStatus {
            url: "u".to_string(),
            status: 400,
            body: r#"{"non_field_errors":["bad"]}"#.to_string(),
        };
        assert_eq!(
            describe_login_error(&err),
            r#"400 - {"non_field_errors":["bad"]}"#
        );
    }
}
