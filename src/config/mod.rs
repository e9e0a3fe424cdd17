//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, CODE_DIR override)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!
//! At startup:
//!     discovery.rs (BACKEND_API env, then backend.base_url)
//!     → backend base URL, injected into the router once
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod discovery;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    ArtifactsConfig, BackendConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    SecurityConfig,
};
