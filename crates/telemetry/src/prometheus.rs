// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_histogram_vec, register_int_counter,
    register_int_counter_vec, Histogram, HistogramVec, IntCounter, IntCounterVec,
};

// Collectors are registered exactly once by `install`.
static REQUESTS_CREATED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static REPORTS_ACCEPTED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static RESOLUTIONS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static SANDBOX_GAS_USED: OnceCell<HistogramVec> = OnceCell::new();
static END_BLOCK_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// Prometheus-backed sink. Metrics are dropped silently until [`install`] runs.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl OracleMetricsSink for PrometheusSink {
    fn inc_requests_created(&self) {
        if let Some(m) = REQUESTS_CREATED_TOTAL.get() {
            m.inc();
        }
    }
    fn inc_reports_accepted(&self) {
        if let Some(m) = REPORTS_ACCEPTED_TOTAL.get() {
            m.inc();
        }
    }
    fn inc_resolutions(&self, status: &'static str) {
        if let Some(m) = RESOLUTIONS_TOTAL.get() {
            m.with_label_values(&[status]).inc();
        }
    }
    fn observe_sandbox_gas(&self, entry: &'static str, gas_used: u64) {
        if let Some(m) = SANDBOX_GAS_USED.get() {
            m.with_label_values(&[entry]).observe(gas_used as f64);
        }
    }
    fn observe_end_block_duration(&self, duration_secs: f64) {
        if let Some(m) = END_BLOCK_DURATION_SECONDS.get() {
            m.observe(duration_secs);
        }
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, code: &'static str) {
        if let Some(m) = ERRORS_TOTAL.get() {
            m.with_label_values(&[kind, code]).inc();
        }
    }
}

fn already_set<T>(_: T) -> prometheus::Error {
    prometheus::Error::Msg("prometheus sink already installed".into())
}

/// Registers all collectors with the default registry and installs the sink
/// globally. Must be called at most once.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    REQUESTS_CREATED_TOTAL
        .set(register_int_counter!(
            "zoracle_requests_created_total",
            "Total number of data requests created."
        )?)
        .map_err(already_set)?;
    REPORTS_ACCEPTED_TOTAL
        .set(register_int_counter!(
            "zoracle_reports_accepted_total",
            "Total number of validator report submissions accepted."
        )?)
        .map_err(already_set)?;
    RESOLUTIONS_TOTAL
        .set(register_int_counter_vec!(
            "zoracle_resolutions_total",
            "Requests reaching a terminal status.",
            &["status"]
        )?)
        .map_err(already_set)?;
    SANDBOX_GAS_USED
        .set(register_histogram_vec!(
            "zoracle_sandbox_gas_used",
            "Gas consumed per sandbox invocation.",
            &["entry"],
            exponential_buckets(1_000.0, 4.0, 12)?
        )?)
        .map_err(already_set)?;
    END_BLOCK_DURATION_SECONDS
        .set(register_histogram!(
            "zoracle_end_block_duration_seconds",
            "Latency of the end-block resolution pass.",
            exponential_buckets(0.0005, 2.0, 15)?
        )?)
        .map_err(already_set)?;
    ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "zoracle_errors_total",
            "Total number of errors, categorized by kind and code.",
            &["kind", "code"]
        )?)
        .map_err(already_set)?;

    static PROM_SINK: PrometheusSink = PrometheusSink;
    SINK.set(&PROM_SINK).map_err(already_set)?;
    Ok(&PROM_SINK)
}
