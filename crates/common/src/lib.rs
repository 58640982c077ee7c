//! Wire types shared by the condominium status API and the smoke-check probes.

pub mod types;

pub use types::{
    HealthPayload, HealthStatus, RedirectPayload, ServiceState, SessionToken, StatusPayload,
};
