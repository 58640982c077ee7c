//! Probe error types.

use thiserror::Error;

/// Errors a probe can run into while talking to the backend.
///
/// Only [`ProbeError::Transport`] on the API root and
/// [`ProbeError::Authentication`] abort a run; everything else is folded
/// into the per-item result records.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection refused, timeout, DNS failure and the like.
    #[error("transport error: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// No configured credential produced a session token.
    #[error("authentication failed after {tried_count} credential(s): {last_error}")]
    Authentication {
        tried_count: usize,
        last_error: String,
    },

    /// The server answered, but not with the status the check expects.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Body is not valid JSON or lacks an expected field.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// `Access-Control-Allow-Origin` missing or not matching the origin.
    #[error("CORS mismatch for origin {origin}: allow-origin is {}", .allowed.as_deref().unwrap_or("absent"))]
    CorsMismatch {
        origin: String,
        allowed: Option<String>,
    },

    /// Invalid probe configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProbeError {
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        ProbeError::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ProbeError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience type alias for probe results.
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_mismatch_reports_absent_header() {
        let err = ProbeError::CorsMismatch {
            origin: "http://localhost:3000".to_string(),
            allowed: None,
        };
        assert_eq!(
            err.to_string(),
            "CORS mismatch for origin http://localhost:3000: allow-origin is absent"
        );
    }

    #[test]
    fn unexpected_status_exposes_code() {
        let err = ProbeError::UnexpectedStatus {
            url: "http://x/api/".to_string(),
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.http_status(), Some(503));
        assert_eq!(ProbeError::Config("x".into()).http_status(), None);
    }
}
