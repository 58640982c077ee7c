//! Flags and setup shared by the probe binaries.

use clap::Args;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{ProbeConfig, timeout_from_secs};
use crate::error::Result;

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Backend URL without the API prefix [default: http://127.0.0.1:8000]
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the outcome as JSON instead of the human report
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    /// Environment configuration with these flags applied on top.
    pub fn load_config(&self) -> Result<ProbeConfig> {
        let mut config = ProbeConfig::from_env()?;
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = timeout_from_secs(secs)?;
        }
        Ok(config)
    }
}

/// Diagnostics go to stderr so stdout carries only the report.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
