//! CsvSink - combined segment files and the batch feature table

use contracts::{
    Axis, CombinedSegment, ContractError, FeatureRecord, Location, OutputConfig, SegmentSink,
    TrialOutput,
};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};

use crate::error::DispatcherError;

/// Configuration for CsvSink
#[derive(Debug, Clone)]
pub struct CsvSinkConfig {
    /// Output directory for every file
    pub directory: PathBuf,
    /// File name of the feature table, written on finish
    pub feature_list: String,
}

impl CsvSinkConfig {
    /// Create config from params map, falling back to the output section
    pub fn from_params(params: &HashMap<String, String>, output: &OutputConfig) -> Self {
        let directory = params
            .get("directory")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&output.directory));
        let feature_list = params
            .get("feature_list")
            .cloned()
            .unwrap_or_else(|| output.feature_list.clone());

        Self {
            directory,
            feature_list,
        }
    }
}

/// Writes the four combined files of every trial and accumulates feature
/// rows for a single table at the end of the batch.
pub struct CsvSink {
    name: String,
    config: CsvSinkConfig,
    features: Vec<FeatureRecord>,
}

impl CsvSink {
    /// Create a new CsvSink
    pub fn new(name: impl Into<String>, config: CsvSinkConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.directory)?;

        Ok(Self {
            name: name.into(),
            config,
            features: Vec::new(),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
        output: &OutputConfig,
    ) -> std::io::Result<Self> {
        Self::new(name, CsvSinkConfig::from_params(params, output))
    }

    /// Path of the feature table.
    pub fn feature_list_path(&self) -> PathBuf {
        self.config.directory.join(&self.config.feature_list)
    }

    fn write_combined(&self, trial: &TrialOutput, segment: &CombinedSegment) -> Result<(), DispatcherError> {
        let path = self.config.directory.join(segment.file_name(&trial.participant));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(CombinedSegment::header(segment.kind))?;

        let mut record = Vec::with_capacity(9);
        for row in &segment.rows {
            record.clear();
            for location in Location::ALL {
                let values = row.get(location);
                record.extend(Axis::ALL.map(|axis| values.get(axis).to_string()));
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;

        debug!(path = %path.display(), rows = segment.len(), "combined file written");
        Ok(())
    }

    fn write_feature_list(&self) -> Result<(), DispatcherError> {
        let Some(first) = self.features.first() else {
            info!(sink = %self.name, "No feature rows, feature table skipped");
            return Ok(());
        };

        let path = self.feature_list_path();
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(std::iter::once("participant").chain(first.names()))?;

        let expected = first.values.len();
        for record in &self.features {
            if record.values.len() != expected {
                return Err(DispatcherError::FeatureLayout {
                    participant: record.participant.to_string(),
                    expected,
                    actual: record.values.len(),
                });
            }
            writer.write_record(
                std::iter::once(record.participant.as_str().to_string())
                    .chain(record.values.iter().map(|v| v.value.to_string())),
            )?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = self.features.len(), "Feature table written");
        Ok(())
    }

    fn to_contract(&self, e: DispatcherError) -> ContractError {
        error!(sink = %self.name, error = %e, "Write failed");
        ContractError::sink_write(&self.name, e.to_string())
    }
}

impl SegmentSink for CsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "csv_sink_write",
        skip(self, trial),
        fields(sink = %self.name, participant = %trial.participant)
    )]
    fn write_trial(&mut self, trial: &TrialOutput) -> Result<(), ContractError> {
        for segment in &trial.combined {
            self.write_combined(trial, segment)
                .map_err(|e| self.to_contract(e))?;
        }
        // only trials whose files made it to disk enter the feature table
        self.features.push(trial.features.clone());
        Ok(())
    }

    #[instrument(name = "csv_sink_finish", skip(self))]
    fn finish(&mut self) -> Result<(), ContractError> {
        self.write_feature_list().map_err(|e| self.to_contract(e))
    }
}
