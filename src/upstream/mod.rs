//! Upstream (backend API) subsystem.
//!
//! # Data Flow
//! ```text
//! handler builds BackendCall (url, optional secret, optional JSON body)
//!     → client.rs (reqwest, one call, no retry)
//!     → BackendResponse (status, content type, buffered body)
//!     → handler relays it to the caller
//! ```

pub mod client;

pub use client::{BackendCall, BackendClient, BackendResponse, UpstreamError};
