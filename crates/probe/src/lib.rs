//! Smoke checks against a running condominium backend.
//!
//! - [`auth::AuthProbe`] logs in with the first working credential.
//! - [`connectivity::ConnectivityVerifier`] checks the API root and sweeps
//!   the protected listings with the session token.
//! - [`cors::CorsVerifier`] replays browser preflight and real requests
//!   for a list of frontend origins.
//!
//! Requests are issued one at a time; nothing runs concurrently.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod connectivity;
pub mod cors;
pub mod error;
pub mod render;

pub use auth::{AuthFailure, AuthProbe, Authenticated, LoginAttempt};
pub use config::{Credential, ProbeConfig};
pub use connectivity::{
    ConnectivityOutcome, ConnectivityVerifier, EndpointCheckResult, EndpointReport, RootCheck,
    count_items, run_connectivity,
};
pub use cors::{
    CorsCheckResult, CorsReport, CorsVerdict, CorsVerifier, ReachabilityProbe,
    classify_allow_origin, classify_preflight, run_cors,
};
pub use error::ProbeError;
