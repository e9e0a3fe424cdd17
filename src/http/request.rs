//! Request identification.
//!
//! # Responsibilities
//! - Name the request ID header
//! - Read the ID assigned by the request-id middleware
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The same ID is sent to the backend and echoed to the caller

use axum::http::HeaderMap;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID assigned to this request, if any.
pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
