//! Request-boundary errors and their HTTP mapping.

use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::fingerprint::ArtifactError;
use crate::http::payload::PayloadError;
use crate::routing::RouteError;
use crate::upstream::UpstreamError;

/// Everything that can stop a request before the backend's answer is relayed.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The shared secret could not be computed; the request is not forwarded.
    #[error("shared secret unavailable: {0}")]
    Secret(#[from] ArtifactError),

    #[error("secret computation task failed: {0}")]
    SecretTask(#[from] tokio::task::JoinError),

    #[error("malformed request payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    #[error("invalid backend path: {0}")]
    Route(#[from] RouteError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("secret is not a valid header value")]
    HeaderValue(#[from] InvalidHeaderValue),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::Route(RouteError::InvalidParam(_)) => StatusCode::BAD_REQUEST,
            Self::Upstream(UpstreamError::Unreachable { .. }) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error is a fail-closed refusal for a missing secret.
    pub fn is_secret_failure(&self) -> bool {
        matches!(self, Self::Secret(_) | Self::SecretTask(_))
    }

    // Internal details go to the log, not to the caller.
    fn public_message(&self) -> String {
        match self {
            Self::Secret(_) | Self::SecretTask(_) | Self::HeaderValue(_) => {
                "shared secret unavailable".to_string()
            }
            Self::MalformedPayload(e) => e.to_string(),
            Self::Route(RouteError::InvalidParam(name)) => format!("invalid `{}`", name),
            Self::Route(_) => "invalid backend route".to_string(),
            Self::Upstream(UpstreamError::Unreachable { .. }) => "backend unreachable".to_string(),
            Self::Upstream(_) => "backend unavailable".to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        let body = serde_json::json!({ "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}
