//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, body limit)
//!     → handlers.rs (route descriptor → backend call)
//!         → payload.rs (write routes: extract the forwarded fields)
//!         → fingerprint (authenticated routes: compute the secret)
//!         → upstream client
//!     → response.rs (relay status/body, echo secret header)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod payload;
pub mod request;
pub mod response;
pub mod server;

pub use error::ProxyError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
