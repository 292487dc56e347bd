//! Per-sink counters for the run summary

/// Write counters of a single sink
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkMetrics {
    /// Trials written
    pub write_count: u64,
    /// Trials the sink failed to write
    pub failure_count: u64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_write(&mut self) {
        self.write_count += 1;
    }

    pub fn record_failure(&mut self) {
        self.failure_count += 1;
    }
}
