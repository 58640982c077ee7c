//! Shared HTTP client construction.

use std::time::Duration;

use reqwest::Response;

use crate::error::{ProbeError, Result};

/// Longest response excerpt kept for diagnostics.
pub const EXCERPT_LEN: usize = 200;

/// Builds the client every probe request goes through.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProbeError::Config(format!("cannot build HTTP client: {e}")))
}

/// Reads the body as text, mapping read failures to transport errors.
pub(crate) async fn read_body(url: &str, response: Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|source| ProbeError::transport(url, source))
}

/// First [`EXCERPT_LEN`] characters of `text`.
pub fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LEN).collect()
}
