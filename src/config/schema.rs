//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the unicorn proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend API settings.
    pub backend: BackendConfig,

    /// Code artifacts feeding the shared secret.
    pub artifacts: ArtifactsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Inbound request limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API. `BACKEND_API` takes precedence when set.
    pub base_url: Option<String>,

    /// Total timeout for one backend call. Unset means no proxy-side timeout.
    pub timeout_secs: Option<u64>,

    /// Header carrying the shared secret, outbound and back to the caller.
    pub secret_header: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
            secret_header: "x-unicorn-api-secret".to_string(),
        }
    }
}

/// Locations of the artifacts hashed into the shared secret.
///
/// All paths are relative to `code_dir` unless absolute.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Root directory of the deployed code. `CODE_DIR` takes precedence when set.
    pub code_dir: String,

    /// Glob selecting the unicorn description files.
    pub descriptions_glob: String,

    /// Sources of the fingerprint module itself, absorbed in this order.
    pub engine_sources: Vec<String>,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            code_dir: "./".to_string(),
            descriptions_glob: "unicorn_descriptions/*".to_string(),
            engine_sources: ENGINE_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Every file whose logic decides what the secret covers.
pub const ENGINE_SOURCES: [&str; 4] = [
    "src/fingerprint/engine.rs",
    "src/fingerprint/artifact.rs",
    "src/fingerprint/provider.rs",
    "src/fingerprint/mod.rs",
];

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Limits applied to inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}
