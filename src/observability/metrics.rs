//! Request counters and their Prometheus exposition.
//!
//! # Metrics
//! - `pvc_plumber_requests_total` (counter): every existence check request
//! - `pvc_plumber_requests_errors_total` (counter): rejected paths and failed checks
//!
//! # Design Decisions
//! - One recorder per server instance, not the global recorder, so separate
//!   servers (and tests) keep separate counts
//! - Counters are registered up front and held as handles; increments are atomic
//! - Rendered by the Prometheus exporter on scrape

use metrics::{Counter, Key, KeyName, Level, Metadata, Recorder, SharedString};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub const REQUESTS_TOTAL: &str = "pvc_plumber_requests_total";
pub const REQUESTS_ERRORS_TOTAL: &str = "pvc_plumber_requests_errors_total";

static METADATA: Metadata<'static> = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Request/error counters backed by a private Prometheus recorder.
pub struct RequestCounters {
    handle: PrometheusHandle,
    total: Counter,
    errors: Counter,
}

impl RequestCounters {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();

        let total = register(
            &recorder,
            REQUESTS_TOTAL,
            "Total number of backup check requests",
        );
        let errors = register(
            &recorder,
            REQUESTS_ERRORS_TOTAL,
            "Total number of failed backup check requests",
        );

        Self {
            handle: recorder.handle(),
            total,
            errors,
        }
    }

    pub fn record_request(&self) {
        self.total.increment(1);
    }

    pub fn record_error(&self) {
        self.errors.increment(1);
    }

    /// Render all counters in the Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for RequestCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCounters").finish_non_exhaustive()
    }
}

fn register(recorder: &impl Recorder, name: &'static str, help: &'static str) -> Counter {
    recorder.describe_counter(KeyName::from_const_str(name), None, SharedString::const_str(help));
    recorder.register_counter(&Key::from_static_name(name), &METADATA)
}
