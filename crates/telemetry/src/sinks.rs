// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// The globally installed sink. Set once at process start.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the configured error metrics sink, or a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured oracle metrics sink, or a no-op sink.
pub fn oracle_metrics() -> &'static dyn OracleMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Metrics emitted by the request/report protocol.
pub trait OracleMetricsSink: Send + Sync + std::fmt::Debug {
    /// A request was created.
    fn inc_requests_created(&self);
    /// A validator's reports were accepted.
    fn inc_reports_accepted(&self);
    /// A request reached a terminal status (`success`, `failure`, `expired`).
    fn inc_resolutions(&self, status: &'static str);
    /// Gas consumed by one sandbox invocation, labelled by entry point.
    fn observe_sandbox_gas(&self, entry: &'static str, gas_used: u64);
    /// Wall time of one end-block pass.
    fn observe_end_block_duration(&self, duration_secs: f64);
}
impl OracleMetricsSink for NopSink {
    fn inc_requests_created(&self) {}
    fn inc_reports_accepted(&self) {}
    fn inc_resolutions(&self, _status: &'static str) {}
    fn observe_sandbox_gas(&self, _entry: &'static str, _gas_used: u64) {}
    fn observe_end_block_duration(&self, _duration_secs: f64) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and code.
    fn inc_error(&self, kind: &'static str, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _code: &'static str) {}
}

/// A unified sink implementing every domain trait.
pub trait MetricsSink: OracleMetricsSink + ErrorMetricsSink {}

impl<T> MetricsSink for T where T: OracleMetricsSink + ErrorMetricsSink {}
