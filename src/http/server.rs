//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router from the route descriptors
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Inject the backend client, secret source and telemetry sink
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::ProxyConfig;
use crate::fingerprint::{SecretProvider, SecretSource};
use crate::http::handlers::{feed_unicorn, get_unicorn, healthcheck, list_unicorns};
use crate::observability::{NoopTelemetry, RequestTelemetry};
use crate::routing::{GET_UNICORN, LIST_UNICORNS};
use crate::upstream::{BackendClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub secrets: Arc<dyn SecretSource>,
    pub telemetry: Arc<dyn RequestTelemetry>,
}

/// HTTP server for the unicorn proxy.
pub struct HttpServer {
    config: ProxyConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server for `backend_url` with the deployment secret provider
    /// and no telemetry.
    pub fn new(config: ProxyConfig, backend_url: Url) -> Result<Self, UpstreamError> {
        let backend = BackendClient::new(backend_url, &config.backend)?;
        let secrets: Arc<dyn SecretSource> =
            Arc::new(SecretProvider::for_deployment(&config.artifacts));

        let state = AppState {
            backend,
            secrets,
            telemetry: Arc::new(NoopTelemetry),
        };
        Ok(Self { config, state })
    }

    /// Replace the secret source.
    pub fn with_secret_source(mut self, secrets: Arc<dyn SecretSource>) -> Self {
        self.state.secrets = secrets;
        self
    }

    /// Replace the telemetry sink.
    pub fn with_telemetry(mut self, telemetry: Arc<dyn RequestTelemetry>) -> Self {
        self.state.telemetry = telemetry;
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/healthcheck", get(healthcheck))
            .route("/", get(healthcheck))
            .route(LIST_UNICORNS.path, get(list_unicorns))
            // Keyed read and write share one path.
            .route(GET_UNICORN.path, get(get_unicorn).post(feed_unicorn))
            .with_state(self.state.clone())
            .layer(RequestBodyLimitLayer::new(self.config.security.max_body_size));

        if let Some(secs) = self.config.backend.timeout_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.state.backend.base_url(),
            "HTTP server starting"
        );

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
