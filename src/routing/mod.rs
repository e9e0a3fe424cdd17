//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarded routes (route.rs, static descriptors)
//!     → server.rs registers each descriptor's path with Axum
//!     → handlers consult the descriptor:
//!         requires_secret → compute and attach the shared secret
//!         body policy     → forward nothing, or a rebuilt minimal body
//!         backend template → percent-encoded backend URL
//! ```
//!
//! # Design Decisions
//! - Routes fixed at startup, immutable at runtime
//! - Deterministic: same input always maps to the same backend URL

pub mod route;

pub use route::{BodyPolicy, RouteDescriptor, RouteError, FEED_UNICORN, GET_UNICORN, LIST_UNICORNS};
