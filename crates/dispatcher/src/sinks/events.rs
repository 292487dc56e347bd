//! EventsSink - one row of detected events per trial

use contracts::{ContractError, OutputConfig, SegmentSink, TrialOutput};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::{error, info, instrument};

use crate::error::DispatcherError;

/// Row of `events.csv`
#[derive(Debug, Serialize)]
struct EventRow<'a> {
    participant: &'a str,
    take_off_index: usize,
    take_off_timestamp: i64,
    left_contact_index: usize,
    left_contact_timestamp: i64,
    right_contact_index: usize,
    right_contact_timestamp: i64,
    knee_flexion_index: usize,
    knee_flexion_timestamp: i64,
}

impl<'a> From<&'a TrialOutput> for EventRow<'a> {
    fn from(trial: &'a TrialOutput) -> Self {
        let e = &trial.events;
        Self {
            participant: trial.participant.as_str(),
            take_off_index: e.take_off.index,
            take_off_timestamp: e.take_off.timestamp,
            left_contact_index: e.left_contact.index,
            left_contact_timestamp: e.left_contact.timestamp,
            right_contact_index: e.right_contact.index,
            right_contact_timestamp: e.right_contact.timestamp,
            knee_flexion_index: e.knee_flexion.index,
            knee_flexion_timestamp: e.knee_flexion.timestamp,
        }
    }
}

/// Sink that tabulates event indices and timestamps
pub struct EventsSink {
    name: String,
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl EventsSink {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Result<Self, DispatcherError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = csv::Writer::from_path(&path)?;

        Ok(Self {
            name: name.into(),
            path,
            writer,
            rows: 0,
        })
    }

    /// `directory` and `file` params, defaulting to the output directory
    /// and `events.csv`.
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
        output: &OutputConfig,
    ) -> Result<Self, DispatcherError> {
        let directory = params
            .get("directory")
            .map(String::as_str)
            .unwrap_or(&output.directory);
        let file = params.get("file").map(String::as_str).unwrap_or("events.csv");
        Self::new(name, PathBuf::from(directory).join(file))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn append(&mut self, trial: &TrialOutput) -> Result<(), DispatcherError> {
        self.writer.serialize(EventRow::from(trial))?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}

impl SegmentSink for EventsSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "events_sink_write",
        skip(self, trial),
        fields(sink = %self.name, participant = %trial.participant)
    )]
    fn write_trial(&mut self, trial: &TrialOutput) -> Result<(), ContractError> {
        self.append(trial).map_err(|e| {
            error!(sink = %self.name, error = %e, "Write failed");
            ContractError::sink_write(&self.name, e.to_string())
        })
    }

    #[instrument(name = "events_sink_finish", skip(self))]
    fn finish(&mut self) -> Result<(), ContractError> {
        self.writer.flush()?;
        info!(path = %self.path.display(), rows = self.rows, "Event table written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trial;
    use tempfile::tempdir;

    #[test]
    fn test_event_table() {
        let dir = tempdir().unwrap();
        let mut sink = EventsSink::new("events", dir.path().join("events.csv")).unwrap();
        sink.write_trial(&trial("P1")).unwrap();
        sink.write_trial(&trial("P2")).unwrap();
        sink.finish().unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("participant,take_off_index,take_off_timestamp,"));
        assert_eq!(lines[1], "P1,10,6250,50,31250,52,32500,300,187500");
    }

    #[test]
    fn test_from_params_defaults() {
        let dir = tempdir().unwrap();
        let output = OutputConfig {
            directory: dir.path().display().to_string(),
            ..Default::default()
        };
        let sink = EventsSink::from_params("events", &HashMap::new(), &output).unwrap();
        assert_eq!(sink.path(), &dir.path().join("events.csv"));
        assert_eq!(sink.name(), "events");
    }
}
