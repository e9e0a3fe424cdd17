//! Route descriptors.
//!
//! # Responsibilities
//! - Declare every forwarded route and its backend counterpart
//! - Record per route whether the shared secret is attached
//! - Record per route how the inbound body is treated
//! - Render backend URLs from path templates
//!
//! # Design Decisions
//! - Descriptors are static and immutable
//! - The health check is answered locally and has no descriptor
//! - Path parameters are pushed as single, percent-encoded segments so a
//!   client-supplied id cannot add path segments or a query string

use axum::http::Method;
use thiserror::Error;
use url::Url;

/// How a route treats the inbound request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// Nothing is forwarded.
    Discard,
    /// Only the `snack` and `teamid` fields are forwarded, in a new body.
    SnackOrder,
}

/// Static mapping from an inbound route to backend behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Route identifier for logging/metrics.
    pub name: &'static str,
    pub method: Method,
    /// Inbound path pattern, in Axum syntax.
    pub path: &'static str,
    /// Backend path template.
    pub backend: &'static str,
    pub requires_secret: bool,
    pub body: BodyPolicy,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("backend base URL cannot carry a path")]
    BaseNotHierarchical,

    #[error("missing path parameter `{0}`")]
    MissingParam(String),

    #[error("path parameter `{0}` is not a valid segment")]
    InvalidParam(String),
}

pub static LIST_UNICORNS: RouteDescriptor = RouteDescriptor {
    name: "list_unicorns",
    method: Method::GET,
    path: "/unicorn",
    backend: "/unicorn",
    requires_secret: false,
    body: BodyPolicy::Discard,
};

pub static GET_UNICORN: RouteDescriptor = RouteDescriptor {
    name: "get_unicorn",
    method: Method::GET,
    path: "/unicorns/{id}",
    backend: "/unicorns/{id}",
    requires_secret: true,
    body: BodyPolicy::Discard,
};

// Writes are not authenticated; kept as deployed.
pub static FEED_UNICORN: RouteDescriptor = RouteDescriptor {
    name: "feed_unicorn",
    method: Method::POST,
    path: "/unicorns/{id}",
    backend: "/unicorns/{id}",
    requires_secret: false,
    body: BodyPolicy::SnackOrder,
};

impl RouteDescriptor {
    /// Render the backend URL for this route under `base`.
    pub fn backend_url(&self, base: &Url, params: &[(&str, &str)]) -> Result<Url, RouteError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RouteError::BaseNotHierarchical)?;
            segments.pop_if_empty();

            for segment in self.backend.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = params
                            .iter()
                            .find(|(key, _)| *key == name)
                            .map(|(_, value)| *value)
                            .ok_or_else(|| RouteError::MissingParam(name.to_string()))?;
                        if matches!(value, "" | "." | "..") {
                            return Err(RouteError::InvalidParam(name.to_string()));
                        }
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }
}
