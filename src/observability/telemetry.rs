//! Request telemetry.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, status
//! - `proxy_request_duration_seconds` (histogram): latency by route
//! - `proxy_secret_failures_total` (counter): fail-closed refusals by route

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::ObservabilityConfig;

/// One completed request, as seen by the proxy.
#[derive(Debug, Clone, Copy)]
pub struct RequestEvent {
    pub route: &'static str,
    pub status: StatusCode,
    pub secret_attached: bool,
    pub secret_failed: bool,
    pub elapsed: Duration,
}

/// Sink for request events. Implementations must not fail the request.
pub trait RequestTelemetry: Send + Sync {
    fn record(&self, event: &RequestEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl RequestTelemetry for NoopTelemetry {
    fn record(&self, _event: &RequestEvent) {}
}

/// Reports events through the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsTelemetry;

impl RequestTelemetry for MetricsTelemetry {
    fn record(&self, event: &RequestEvent) {
        metrics::counter!(
            "proxy_requests_total",
            "route" => event.route,
            "status" => event.status.as_u16().to_string()
        )
        .increment(1);
        metrics::histogram!("proxy_request_duration_seconds", "route" => event.route)
            .record(event.elapsed.as_secs_f64());
        if event.secret_failed {
            metrics::counter!("proxy_secret_failures_total", "route" => event.route).increment(1);
        }
    }
}

/// Build the telemetry sink for this process.
///
/// Falls back to [`NoopTelemetry`] when metrics are disabled or the exporter
/// cannot be installed. Must be called inside a Tokio runtime.
pub fn init_telemetry(config: &ObservabilityConfig) -> Arc<dyn RequestTelemetry> {
    if !config.metrics_enabled {
        return Arc::new(NoopTelemetry);
    }

    let addr: SocketAddr = match config.metrics_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::warn!(
                metrics_address = %config.metrics_address,
                error = %e,
                "Invalid metrics address, telemetry disabled"
            );
            return Arc::new(NoopTelemetry);
        }
    };

    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics endpoint listening");
            Arc::new(MetricsTelemetry)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to start metrics exporter, telemetry disabled");
            Arc::new(NoopTelemetry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> RequestEvent {
        RequestEvent {
            route: "get_unicorn",
            status: StatusCode::OK,
            secret_attached: true,
            secret_failed: false,
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_disabled_metrics_use_noop() {
        let sink = init_telemetry(&ObservabilityConfig::default());
        sink.record(&event());
    }

    #[test]
    fn test_bad_address_falls_back() {
        let config = ObservabilityConfig {
            metrics_enabled: true,
            metrics_address: "nowhere".into(),
            ..ObservabilityConfig::default()
        };
        let sink = init_telemetry(&config);
        sink.record(&event());
    }

    #[test]
    fn test_metrics_sink_without_recorder_is_harmless() {
        MetricsTelemetry.record(&RequestEvent {
            secret_failed: true,
            ..event()
        });
    }
}
