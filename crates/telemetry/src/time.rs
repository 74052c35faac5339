// Path: crates/telemetry/src/time.rs
use crate::sinks::OracleMetricsSink;
use std::time::Instant;

/// Reports the elapsed time of an end-block pass when dropped.
pub struct Timer<'a> {
    sink: &'a dyn OracleMetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    /// Starts timing.
    pub fn new(sink: &'a dyn OracleMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_end_block_duration(self.start.elapsed().as_secs_f64());
    }
}
