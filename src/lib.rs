//! Unicorn API proxy library.
//!
//! An authenticating reverse proxy between mobile clients and the unicorn
//! backend API. Authenticated calls carry a shared secret derived from the
//! deployed code itself (see [`fingerprint`]).

pub mod config;
pub mod fingerprint;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use fingerprint::{Secret, SecretProvider, SecretSource};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
