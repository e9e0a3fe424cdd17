//! Backend URL discovery.
//!
//! The proxy needs exactly one piece of deployment knowledge from outside:
//! where the backend API lives. Startup asks a [`BackendDiscovery`] once and
//! injects the answer into the router; nothing re-reads it afterwards.

use thiserror::Error;

/// Environment variable holding the backend base URL.
pub const BACKEND_API_ENV: &str = "BACKEND_API";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("backend URL not configured (set BACKEND_API or backend.base_url)")]
    NotConfigured,
}

/// A source of the backend base URL.
pub trait BackendDiscovery: Send + Sync + std::fmt::Debug {
    /// Returns the backend base URL, or `None` if this source has no opinion.
    fn lookup(&self) -> Option<String>;
}

/// A URL fixed in configuration.
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    url: Option<String>,
}

impl StaticDiscovery {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }
}

impl BackendDiscovery for StaticDiscovery {
    fn lookup(&self) -> Option<String> {
        self.url.clone()
    }
}

/// A URL read from an environment variable at lookup time.
#[derive(Debug, Clone)]
pub struct EnvDiscovery {
    var: String,
}

impl EnvDiscovery {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvDiscovery {
    fn default() -> Self {
        Self::new(BACKEND_API_ENV)
    }
}

impl BackendDiscovery for EnvDiscovery {
    fn lookup(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Tries each source in order; the first answer wins.
#[derive(Debug)]
pub struct ChainedDiscovery {
    sources: Vec<Box<dyn BackendDiscovery>>,
}

impl ChainedDiscovery {
    pub fn new(sources: Vec<Box<dyn BackendDiscovery>>) -> Self {
        Self { sources }
    }
}

impl BackendDiscovery for ChainedDiscovery {
    fn lookup(&self) -> Option<String> {
        self.sources.iter().find_map(|s| s.lookup())
    }
}
