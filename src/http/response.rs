//! Response relaying.
//!
//! # Responsibilities
//! - Turn a buffered backend response into the caller's response
//! - Echo the shared secret so the caller can verify it
//!
//! # Design Decisions
//! - Status code and body bytes are relayed unchanged
//! - Content type is relayed; JSON is assumed when the backend sends none
//! - Other backend headers are not relayed

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue};
use axum::response::Response;

use crate::fingerprint::Secret;
use crate::http::error::ProxyError;
use crate::upstream::BackendResponse;

/// Build the caller's response from the backend's, optionally echoing a secret.
pub fn relay(
    upstream: BackendResponse,
    echo: Option<(&HeaderName, &Secret)>,
) -> Result<Response, ProxyError> {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);

    if let Some((name, secret)) = echo {
        let value = HeaderValue::from_str(secret.as_str())?;
        response.headers_mut().insert(name.clone(), value);
    }

    Ok(response)
}
