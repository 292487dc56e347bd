//! SinkHandle - wraps a sink with its counters and error logging

use contracts::{ContractError, SegmentSink, TrialOutput};
use tracing::{debug, error, instrument};

use crate::metrics::SinkMetrics;

/// Handle to one configured sink
pub struct SinkHandle {
    sink: Box<dyn SegmentSink>,
    metrics: SinkMetrics,
}

impl SinkHandle {
    pub fn new(sink: Box<dyn SegmentSink>) -> Self {
        Self {
            sink,
            metrics: SinkMetrics::new(),
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        self.sink.name()
    }

    /// Get current metrics
    pub fn metrics(&self) -> SinkMetrics {
        self.metrics
    }

    /// Writes one trial, counting and logging the outcome.
    #[instrument(
        name = "sink_handle_write",
        skip(self, trial),
        fields(sink = %self.sink.name(), participant = %trial.participant)
    )]
    pub fn write(&mut self, trial: &TrialOutput) -> Result<(), ContractError> {
        match self.sink.write_trial(trial) {
            Ok(()) => {
                self.metrics.record_write();
                debug!("trial written");
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(error = %e, "Sink write failed");
                Err(e)
            }
        }
    }

    /// Finishes the sink, consuming the handle.
    pub fn finish(mut self) -> Result<SinkMetrics, ContractError> {
        self.sink.finish().inspect_err(|e| {
            error!(sink = %self.sink.name(), error = %e, "Sink finish failed");
        })?;
        debug!(
            sink = %self.sink.name(),
            written = self.metrics.write_count,
            failed = self.metrics.failure_count,
            "Sink finished"
        );
        Ok(self.metrics)
    }
}
