//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the backend base URL once
//! - Probe the artifact set so a broken deployment is visible in the log
//! - Initialize telemetry and the HTTP server
//! - Bind the listener last (traffic only when ready)

use thiserror::Error;
use tokio::net::TcpListener;
use url::Url;

use crate::config::discovery::{BackendDiscovery, ChainedDiscovery, EnvDiscovery, StaticDiscovery};
use crate::config::validation::check_backend_url;
use crate::config::{ConfigError, ProxyConfig};
use crate::fingerprint::{SecretProvider, SecretSource};
use crate::http::HttpServer;
use crate::observability::init_telemetry;
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// `BACKEND_API` first, then `backend.base_url`.
pub fn default_discovery(config: &ProxyConfig) -> ChainedDiscovery {
    ChainedDiscovery::new(vec![
        Box::new(EnvDiscovery::default()),
        Box::new(StaticDiscovery::new(config.backend.base_url.clone())),
    ])
}

/// Ask `discovery` for the backend URL and check it is usable.
pub fn resolve_backend_url(discovery: &dyn BackendDiscovery) -> Result<Url, ConfigError> {
    let raw = discovery
        .lookup()
        .ok_or(crate::config::discovery::DiscoveryError::NotConfigured)?;
    check_backend_url(&raw).map_err(|reason| ConfigError::BackendUrl { url: raw, reason })
}

/// Compute the secret once on the blocking pool and log the outcome.
async fn probe_secret(config: &ProxyConfig) {
    let provider = SecretProvider::for_deployment(&config.artifacts);
    let code_dir = &config.artifacts.code_dir;

    match tokio::task::spawn_blocking(move || provider.get_secret()).await {
        Ok(Ok(secret)) => tracing::info!(
            code_dir = %code_dir,
            secret = ?secret,
            "Shared secret available"
        ),
        Ok(Err(e)) => tracing::warn!(
            code_dir = %code_dir,
            error = %e,
            "Shared secret unavailable; authenticated routes will fail"
        ),
        Err(e) => tracing::warn!(error = %e, "Shared secret probe did not complete"),
    }
}

/// Build the server and bind its listener.
pub async fn bootstrap(config: ProxyConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let backend_url = resolve_backend_url(&default_discovery(&config))?;
    tracing::info!(backend = %backend_url, "Backend set");

    probe_secret(&config).await;

    let telemetry = init_telemetry(&config.observability);
    let address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, backend_url)?.with_telemetry(telemetry);

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((server, listener))
}
