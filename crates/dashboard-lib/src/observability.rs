//! Observability infrastructure for the dashboard
//!
//! Provides:
//! - Prometheus metrics (list latency, fetch latency, request and error counts)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter,
    IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    list_latency_seconds: Histogram,
    fetch_latency_seconds: Histogram,
    list_requests: IntCounter,
    list_errors: IntCounter,
    deployments_listed: IntGauge,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            list_latency_seconds: register_histogram!(
                "dashboard_list_latency_seconds",
                "Time spent producing a deployment list, fetch included",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register list_latency_seconds"),

            fetch_latency_seconds: register_histogram!(
                "dashboard_fetch_latency_seconds",
                "Time spent waiting on the cluster API fan-in",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fetch_latency_seconds"),

            list_requests: register_int_counter!(
                "dashboard_list_requests_total",
                "Total number of deployment list requests"
            )
            .expect("Failed to register list_requests"),

            list_errors: register_int_counter!(
                "dashboard_list_errors_total",
                "Total number of deployment list requests that failed"
            )
            .expect("Failed to register list_errors"),

            deployments_listed: register_int_gauge!(
                "dashboard_deployments_listed",
                "Deployments matching the filter of the last list request"
            )
            .expect("Failed to register deployments_listed"),
        }
    }
}

/// Dashboard metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new)
    }

    pub fn observe_list_latency(&self, duration_secs: f64) {
        self.inner().list_latency_seconds.observe(duration_secs);
    }

    pub fn observe_fetch_latency(&self, duration_secs: f64) {
        self.inner().fetch_latency_seconds.observe(duration_secs);
    }

    pub fn inc_list_requests(&self) {
        self.inner().list_requests.inc();
    }

    pub fn inc_list_errors(&self) {
        self.inner().list_errors.inc();
    }

    pub fn set_deployments_listed(&self, count: usize) {
        self.inner().deployments_listed.set(count as i64);
    }
}

/// Structured logger for dashboard events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a successfully served deployment list
    pub fn log_list_served(
        &self,
        namespaces: &[String],
        total_items: usize,
        returned_items: usize,
        latency_ms: u128,
    ) {
        info!(
            event = "deployment_list_served",
            instance = %self.instance,
            namespaces = ?namespaces,
            total_items = total_items,
            returned_items = returned_items,
            latency_ms = latency_ms as u64,
            "Served deployment list"
        );
    }

    /// Log a list request that failed on the cluster fetch
    pub fn log_list_failed(&self, namespaces: &[String], error: &str) {
        warn!(
            event = "deployment_list_failed",
            instance = %self.instance,
            namespaces = ?namespaces,
            error = %error,
            "Failed to build deployment list"
        );
    }

    pub fn log_startup(&self, version: &str, port: u16) {
        info!(
            event = "dashboard_started",
            instance = %self.instance,
            version = %version,
            port = port,
            "Deployment dashboard started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "dashboard_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Deployment dashboard shutting down"
        );
    }
}
