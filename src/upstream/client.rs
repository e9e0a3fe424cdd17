//! Backend API client.
//!
//! # Responsibilities
//! - Issue one outbound call per inbound request
//! - Attach the shared secret and request ID when given
//! - Buffer the backend response for relaying
//!
//! # Design Decisions
//! - No retries: the backend's answer, error or not, is authoritative
//! - Non-2xx statuses are responses, not errors
//! - Only a missing response (connect/read failure) is an error

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;
use crate::fingerprint::Secret;
use crate::http::request::X_REQUEST_ID;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The backend could not be reached or its response could not be read.
    #[error("backend request to {url} failed: {source}")]
    Unreachable {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build backend client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid secret header name `{0}`")]
    InvalidHeader(String),
}

/// One outbound request.
#[derive(Debug)]
pub struct BackendCall {
    pub method: Method,
    pub url: Url,
    pub secret: Option<Secret>,
    pub json: Option<Value>,
    pub request_id: Option<String>,
}

/// A buffered backend response.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    secret_header: HeaderName,
}

impl BackendClient {
    pub fn new(base_url: Url, config: &BackendConfig) -> Result<Self, UpstreamError> {
        let secret_header = HeaderName::from_bytes(config.secret_header.as_bytes())
            .map_err(|_| UpstreamError::InvalidHeader(config.secret_header.clone()))?;

        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            base_url,
            secret_header,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn secret_header(&self) -> &HeaderName {
        &self.secret_header
    }

    /// Send a call and buffer the whole response.
    pub async fn send(&self, call: BackendCall) -> Result<BackendResponse, UpstreamError> {
        let BackendCall {
            method,
            url,
            secret,
            json,
            request_id,
        } = call;

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(secret) = &secret {
            request = request.header(self.secret_header.clone(), secret.as_str());
        }
        if let Some(id) = &request_id {
            request = request.header(X_REQUEST_ID, id.as_str());
        }
        if let Some(body) = &json {
            request = request.json(body);
        }

        tracing::debug!(
            method = %method,
            url = %url,
            secret_attached = secret.is_some(),
            "Calling backend"
        );

        let unreachable = |source: reqwest::Error| UpstreamError::Unreachable {
            url: url.clone(),
            source,
        };

        let response = request.send().await.map_err(unreachable)?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(unreachable)?;

        tracing::debug!(url = %url, status = %status, bytes = body.len(), "Backend responded");

        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }
}
