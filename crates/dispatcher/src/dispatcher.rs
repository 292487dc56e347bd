//! Dispatcher - fan-out of trial outputs to sinks

use tracing::{info, instrument, warn};

use contracts::{OutputConfig, SegmentSink, SinkConfig, SinkType, TrialOutput};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::SinkMetrics;
use crate::sinks::{CsvSink, EventsSink, LogSink};

/// Create a sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config, output),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(
    config: &SinkConfig,
    output: &OutputConfig,
) -> Result<Box<dyn SegmentSink>, DispatcherError> {
    match config.sink_type {
        SinkType::Log => Ok(Box::new(LogSink::new(&config.name))),
        SinkType::Csv => {
            let sink = CsvSink::from_params(&config.name, &config.params, output)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(Box::new(sink))
        }
        SinkType::Events => {
            let sink = EventsSink::from_params(&config.name, &config.params, output)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(Box::new(sink))
        }
    }
}

/// Fans every trial out to all configured sinks
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sinks (for testing)
    pub fn with_sinks(sinks: Vec<Box<dyn SegmentSink>>) -> Self {
        Self {
            handles: sinks.into_iter().map(SinkHandle::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.handles.iter().map(|h| h.name()).collect()
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, SinkMetrics)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics()))
            .collect()
    }

    /// Writes `trial` to every sink.
    ///
    /// A failing sink does not stop the others; the first failure is
    /// returned after all sinks were tried.
    pub fn dispatch(&mut self, trial: &TrialOutput) -> Result<(), DispatcherError> {
        let mut first_error = None;
        for handle in &mut self.handles {
            if let Err(e) = handle.write(trial) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Finishes every sink, returning per-sink metrics.
    #[instrument(name = "dispatcher_finish", skip(self), fields(sinks = self.handles.len()))]
    pub fn finish(self) -> Result<Vec<(String, SinkMetrics)>, DispatcherError> {
        let mut first_error = None;
        let mut metrics = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let name = handle.name().to_string();
            match handle.finish() {
                Ok(m) => metrics.push((name, m)),
                Err(e) => {
                    warn!(sink = %name, error = %e, "Sink did not finish cleanly");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e.into());
        }
        info!("Dispatcher shutdown complete");
        Ok(metrics)
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip_all, fields(sink_count = sink_configs.len()))]
pub fn create_dispatcher(
    sink_configs: &[SinkConfig],
    output: &OutputConfig,
) -> Result<Dispatcher, DispatcherError> {
    let sinks = sink_configs
        .iter()
        .map(|config| create_sink(config, output))
        .collect::<Result<Vec<_>, _>>()?;
    info!(sinks = sinks.len(), "Dispatcher started");
    Ok(Dispatcher::with_sinks(sinks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trial;
    use contracts::ContractError;
    use tempfile::tempdir;

    struct FailingSink;

    impl SegmentSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn write_trial(&mut self, _trial: &TrialOutput) -> Result<(), ContractError> {
            Err(ContractError::sink_write("failing", "disk full"))
        }

        fn finish(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    #[test]
    fn test_dispatcher_fanout() {
        let mut dispatcher = Dispatcher::with_sinks(vec![
            Box::new(LogSink::new("sink1")),
            Box::new(LogSink::new("sink2")),
        ]);

        for participant in ["P1", "P2", "P3"] {
            dispatcher.dispatch(&trial(participant)).unwrap();
        }

        let metrics = dispatcher.finish().unwrap();
        assert_eq!(metrics.len(), 2);
        assert!(metrics.iter().all(|(_, m)| m.write_count == 3));
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let mut dispatcher =
            Dispatcher::with_sinks(vec![Box::new(FailingSink), Box::new(LogSink::new("log"))]);

        let err = dispatcher.dispatch(&trial("P1")).unwrap_err();
        assert!(matches!(err, DispatcherError::Contract(ContractError::SinkWrite { .. })));

        let metrics = dispatcher.metrics();
        assert_eq!(metrics[0].1.failure_count, 1);
        assert_eq!(metrics[1].1.write_count, 1);
    }

    #[test]
    fn test_create_dispatcher_from_config() {
        let dir = tempdir().unwrap();
        let output = OutputConfig {
            directory: dir.path().display().to_string(),
            ..Default::default()
        };
        let configs = vec![
            SinkConfig::new("segments", SinkType::Csv),
            SinkConfig::new("events", SinkType::Events),
            SinkConfig::new("test_log", SinkType::Log),
        ];

        let mut dispatcher = create_dispatcher(&configs, &output).unwrap();
        assert_eq!(dispatcher.sink_names(), vec!["segments", "events", "test_log"]);

        dispatcher.dispatch(&trial("P1")).unwrap();
        dispatcher.finish().unwrap();

        assert!(dir.path().join("P1-S2-gyro-combined.csv").exists());
        assert!(dir.path().join("events.csv").exists());
        assert!(dir.path().join("feature_list.csv").exists());
    }
}
