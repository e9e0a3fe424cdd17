//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → telemetry.rs (per-request events: route, status, latency)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through access spans and backend calls
//! - Telemetry is optional; the no-op sink is the default
//! - A telemetry sink that fails to start never blocks serving

pub mod logging;
pub mod telemetry;

pub use logging::init_logging;
pub use telemetry::{init_telemetry, MetricsTelemetry, NoopTelemetry, RequestEvent, RequestTelemetry};
