//! Route handlers.
//!
//! Each handler maps one [`RouteDescriptor`] onto the backend: render the
//! backend URL, compute the secret if the route requires it, forward, relay.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::fingerprint::Secret;
use crate::http::error::ProxyError;
use crate::http::payload::SnackOrder;
use crate::http::request::request_id;
use crate::http::response::relay;
use crate::http::server::AppState;
use crate::observability::RequestEvent;
use crate::routing::{BodyPolicy, RouteDescriptor, FEED_UNICORN, GET_UNICORN, LIST_UNICORNS};
use crate::upstream::BackendCall;

/// Liveness probe. Never touches the backend or the artifact set.
pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// List unicorns. Unauthenticated, so it keeps working when the secret cannot
/// be computed.
pub async fn list_unicorns(State(state): State<AppState>, headers: HeaderMap) -> Response {
    proxy(&state, &LIST_UNICORNS, &[], &headers, None).await
}

/// Details of one unicorn. The secret is attached to the backend call and
/// echoed back to the caller.
pub async fn get_unicorn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    proxy(&state, &GET_UNICORN, &[("id", id.as_str())], &headers, None).await
}

/// Feed a unicorn. Only `snack` and `teamid` reach the backend.
pub async fn feed_unicorn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    proxy(&state, &FEED_UNICORN, &[("id", id.as_str())], &headers, Some(body)).await
}

async fn proxy(
    state: &AppState,
    route: &'static RouteDescriptor,
    params: &[(&str, &str)],
    headers: &HeaderMap,
    body: Option<Bytes>,
) -> Response {
    let started = Instant::now();
    let request_id = request_id(headers);

    let outcome = forward(state, route, params, request_id.clone(), body).await;
    let secret_failed = matches!(&outcome, Err(e) if e.is_secret_failure());
    let (response, secret_attached) = match outcome {
        Ok(forwarded) => forwarded,
        Err(e) => (e.into_response(), false),
    };

    state.telemetry.record(&RequestEvent {
        route: route.name,
        status: response.status(),
        secret_attached,
        secret_failed,
        elapsed: started.elapsed(),
    });

    tracing::info!(
        request_id = request_id.as_deref().unwrap_or("unknown"),
        route = route.name,
        status = response.status().as_u16(),
        secret_attached,
        "Request proxied"
    );

    response
}

async fn forward(
    state: &AppState,
    route: &'static RouteDescriptor,
    params: &[(&str, &str)],
    request_id: Option<String>,
    body: Option<Bytes>,
) -> Result<(Response, bool), ProxyError> {
    let url = route.backend_url(state.backend.base_url(), params)?;

    let json = match route.body {
        BodyPolicy::SnackOrder => {
            Some(SnackOrder::from_body(body.as_deref().unwrap_or_default())?.to_json())
        }
        BodyPolicy::Discard => None,
    };

    let secret = if route.requires_secret {
        Some(compute_secret(state).await?)
    } else {
        None
    };

    let upstream = state
        .backend
        .send(BackendCall {
            method: route.method.clone(),
            url,
            secret: secret.clone(),
            json,
            request_id,
        })
        .await?;

    let echo = secret.as_ref().map(|s| (state.backend.secret_header(), s));
    let response = relay(upstream, echo)?;
    Ok((response, secret.is_some()))
}

/// Compute the secret on the blocking pool; file reads and hashing block.
async fn compute_secret(state: &AppState) -> Result<Secret, ProxyError> {
    let source = state.secrets.clone();
    let secret = tokio::task::spawn_blocking(move || source.get_secret()).await??;
    Ok(secret)
}
