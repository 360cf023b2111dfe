//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the storage client produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request/error counters)
//!
//! Consumers:
//!     → stdout (JSON or text)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (namespace, pvc, request_id) on every event
//! - Counters go through a `metrics` recorder and the Prometheus exporter

pub mod logging;
pub mod metrics;

pub use self::metrics::RequestCounters;
