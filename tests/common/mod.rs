//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use url::Url;

use unicorn_proxy::config::ProxyConfig;
use unicorn_proxy::observability::{RequestEvent, RequestTelemetry};
use unicorn_proxy::{HttpServer, Shutdown};

/// A request as seen by the stub backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: &'static str,
    requests: Arc<Mutex<Vec<Captured>>>,
}

/// A backend that answers every request with a fixed JSON response and
/// records what it received.
pub struct StubBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl StubBackend {
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

async fn capture(State(state): State<StubState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    state.requests.lock().unwrap().push(Captured {
        method: parts.method,
        path: parts.uri.path().to_string(),
        headers: parts.headers,
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
        .into_response()
}

/// Start a stub backend on an ephemeral port.
pub async fn start_stub_backend(status: u16, body: &'static str) -> StubBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new().fallback(capture).with_state(StubState {
        status: StatusCode::from_u16(status).unwrap(),
        body,
        requests: requests.clone(),
    });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubBackend { addr, requests }
}

/// Start a backend that writes a raw HTTP response (no content type) to every
/// connection.
pub async fn start_raw_backend(status_line: &'static str, body: &'static str) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut buf).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// A URL nothing listens on.
pub fn closed_backend() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// A code directory laid out like a deployment.
pub fn code_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let descriptions = dir.path().join("unicorn_descriptions");
    fs::create_dir_all(&descriptions).unwrap();
    fs::write(descriptions.join("sparkle.txt"), "Sparkle\nLoves apples.\n").unwrap();
    fs::write(descriptions.join("glitter.txt"), "Glitter\nLoves carrots.\n").unwrap();

    let sources = dir.path().join("src/fingerprint");
    fs::create_dir_all(&sources).unwrap();
    for name in ["engine.rs", "artifact.rs", "provider.rs", "mod.rs"] {
        fs::write(sources.join(name), format!("// fingerprint {}\n", name)).unwrap();
    }
    dir
}

pub fn config_for(dir: &TempDir) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.artifacts.code_dir = dir.path().to_string_lossy().into_owned();
    config
}

/// A proxy running on an ephemeral port; shuts down on drop.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_proxy(server: HttpServer) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestProxy { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Telemetry sink that keeps every event.
#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<RequestEvent>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<RequestEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl RequestTelemetry for RecordingTelemetry {
    fn record(&self, event: &RequestEvent) {
        self.events.lock().unwrap().push(*event);
    }
}
