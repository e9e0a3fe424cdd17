//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, header names and glob syntax
//! - Reject backend URLs the upstream client cannot call
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("backend.base_url `{url}` is invalid: {reason}")]
    BackendUrl { url: String, reason: String },

    #[error("backend.secret_header `{0}` is not a valid header name")]
    SecretHeader(String),

    #[error("artifacts.descriptions_glob `{pattern}` is invalid: {reason}")]
    DescriptionsGlob { pattern: String, reason: String },

    #[error("artifacts.engine_sources must list at least one non-empty path")]
    EngineSource,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("security.max_body_size must be greater than zero")]
    MaxBodySize,
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(url) = &config.backend.base_url {
        if let Err(reason) = check_backend_url(url) {
            errors.push(ValidationError::BackendUrl { url: url.clone(), reason });
        }
    }

    if HeaderName::from_bytes(config.backend.secret_header.as_bytes()).is_err() {
        errors.push(ValidationError::SecretHeader(config.backend.secret_header.clone()));
    }

    if let Err(e) = globset::Glob::new(&config.artifacts.descriptions_glob) {
        errors.push(ValidationError::DescriptionsGlob {
            pattern: config.artifacts.descriptions_glob.clone(),
            reason: e.to_string(),
        });
    }

    let sources = &config.artifacts.engine_sources;
    if sources.is_empty() || sources.iter().any(|s| s.trim().is_empty()) {
        errors.push(ValidationError::EngineSource);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::MaxBodySize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a backend base URL, accepting only absolute http(s) URLs.
pub fn check_backend_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{}`", other)),
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err("URL has no host".to_string());
    }
    Ok(url)
}
