//! LogSink - logs trial summary via tracing

use contracts::{ContractError, SegmentSink, TrialOutput};
use tracing::{info, instrument};

/// Sink that logs trial summaries
pub struct LogSink {
    name: String,
    trials: usize,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trials: 0,
        }
    }

    fn log_trial_summary(&self, trial: &TrialOutput) {
        let e = &trial.events;
        let rows: Vec<usize> = trial.combined.iter().map(|c| c.len()).collect();

        info!(
            sink = %self.name,
            participant = %trial.participant,
            take_off = e.take_off.timestamp,
            left_contact = e.left_contact.timestamp,
            right_contact = e.right_contact.timestamp,
            knee_flexion = e.knee_flexion.timestamp,
            rows = ?rows,
            features = trial.features.values.len(),
            "Trial segmented"
        );
    }
}

impl SegmentSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, trial),
        fields(sink = %self.name, participant = %trial.participant)
    )]
    fn write_trial(&mut self, trial: &TrialOutput) -> Result<(), ContractError> {
        self.log_trial_summary(trial);
        self.trials += 1;
        Ok(())
    }

    #[instrument(name = "log_sink_finish", skip(self))]
    fn finish(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, trials = self.trials, "LogSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trial;

    #[test]
    fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        assert!(sink.write_trial(&trial("P1")).is_ok());
        assert!(sink.finish().is_ok());
        assert_eq!(sink.trials, 1);
    }

    #[test]
    fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
