//! Pipeline orchestrator - drives one batch over a recording directory.
//!
//! Files are pushed through the trial assembler in sorted order; every
//! completed trial is loaded, conditioned, segmented and handed to the
//! dispatcher before the next file is looked at.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use conditioning::Conditioner;
use contracts::{PipelineBlueprint, TrialOutput, TrialRecording};
use dispatcher::{create_dispatcher, Dispatcher};
use ingestion::{list_recordings, load_trial, write_stream, SkippedFile, TrialAssembler, TrialFiles};
use segmentation::TrialSegmenter;
use tracing::{debug, info, instrument, warn};

use super::PipelineStats;
use crate::error::TrialError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The effective configuration, CLI overrides applied
    pub blueprint: PipelineBlueprint,

    /// Directory holding the sensor recordings
    pub input: PathBuf,

    /// Run alignment, cropping and filtering before segmentation
    pub conditioning: bool,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
    conditioner: Conditioner,
    segmenter: TrialSegmenter,
    dispatcher: Dispatcher,
    conditioned_dir: Option<PathBuf>,
    stats: PipelineStats,
}

impl Pipeline {
    /// Builds every component up front so configuration errors surface
    /// before the first trial.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let blueprint = &config.blueprint;

        let conditioner = if config.conditioning {
            Conditioner::from_config(&blueprint.conditioning)
                .context("Failed to build signal conditioner")?
        } else {
            info!("Conditioning disabled, trials are segmented as recorded");
            Conditioner::passthrough()
        };

        let dispatcher = create_dispatcher(&blueprint.effective_sinks(), &blueprint.output)
            .context("Failed to create output sinks")?;

        let conditioned_dir = blueprint
            .output
            .write_conditioned
            .then(|| Path::new(&blueprint.output.directory).join("conditioned"));
        if let Some(dir) = &conditioned_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        Ok(Self {
            segmenter: TrialSegmenter::new(blueprint.detection.clone()),
            conditioner,
            dispatcher,
            conditioned_dir,
            stats: PipelineStats::default(),
            config,
        })
    }

    /// Runs the batch to completion, or until `shutdown` is raised.
    ///
    /// `shutdown` is checked between files; the trial in flight always
    /// finishes and the sinks are always closed.
    #[instrument(name = "pipeline_run", skip_all, fields(input = %self.config.input.display()))]
    pub fn run(mut self, shutdown: &AtomicBool) -> Result<PipelineStats> {
        let start_time = Instant::now();

        let files = list_recordings(&self.config.input)
            .with_context(|| format!("Failed to list {}", self.config.input.display()))?;
        self.stats.files_listed = files.len();
        info!(files = files.len(), sinks = self.dispatcher.len(), "Starting batch");

        let mut assembler = TrialAssembler::new(self.config.blueprint.devices.clone());
        for path in &files {
            if shutdown.load(Ordering::SeqCst) {
                warn!("Shutdown requested, stopping before the next trial");
                self.stats.interrupted = true;
                break;
            }

            if let Some(trial) = assembler.push(path) {
                self.process(&trial);
            }
            self.record_skipped(assembler.drain_skipped());
        }

        if !self.stats.interrupted {
            if let Some(trial) = assembler.finish() {
                self.process(&trial);
            }
        }
        self.record_skipped(assembler.drain_skipped());

        self.stats.sink_metrics = self
            .dispatcher
            .finish()
            .context("Failed to finalize output sinks")?;
        self.stats.duration = start_time.elapsed();

        info!(
            trials_ok = self.stats.trials_ok(),
            trials_failed = self.stats.trials_failed(),
            duration_secs = self.stats.duration.as_secs_f64(),
            "Batch finished"
        );
        Ok(self.stats)
    }

    /// Runs one trial; a failure is logged and counted, never propagated.
    fn process(&mut self, files: &TrialFiles) {
        let started = Instant::now();
        match self.process_trial(files) {
            Ok(output) => {
                let elapsed = started.elapsed();
                observability::record_trial_output(&output);
                observability::record_trial_duration_ms(elapsed.as_secs_f64() * 1000.0);
                self.stats.record_success(&output, elapsed);
            }
            Err(e) => {
                warn!(
                    participant = %files.participant(),
                    kind = e.kind(),
                    error = %e,
                    "Trial failed"
                );
                observability::record_trial_failed(e.kind());
                self.stats.record_failure(e.kind());
            }
        }
    }

    #[instrument(name = "process_trial", skip_all, fields(participant = %files.participant()))]
    fn process_trial(&mut self, files: &TrialFiles) -> Result<TrialOutput, TrialError> {
        if !files.is_complete() {
            debug!(missing = ?files.missing(), "trial is incomplete");
        }

        let recording = load_trial(files)?;
        let recording = self.conditioner.condition(recording)?;
        if let Some(dir) = &self.conditioned_dir {
            write_conditioned(dir, &recording)?;
        }

        let output = self.segmenter.segment(&recording)?;
        self.dispatcher.dispatch(&output)?;
        Ok(output)
    }

    fn record_skipped(&mut self, skipped: Vec<SkippedFile>) {
        for file in &skipped {
            observability::record_file_skipped(file.reason.label());
        }
        self.stats.record_skipped(skipped.len());
    }
}

/// Writes every stream as `<participant>-<LOCATION>-<acc|gyro>.csv`.
fn write_conditioned(dir: &Path, recording: &TrialRecording) -> Result<(), ingestion::IngestionError> {
    let stem = recording.participant().file_stem();
    for channel in recording.channels() {
        if let Some(stream) = recording.get(channel) {
            let name = format!("{}-{}-{}.csv", stem, channel.location.label(), channel.kind.tag());
            write_stream(&dir.join(name), stream)?;
        }
    }
    debug!(dir = %dir.display(), "conditioned streams written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DeviceMap, SinkConfig, SinkType};
    use ::tests::fixtures;

    fn config(input: &Path, output: &Path) -> PipelineConfig {
        let mut blueprint = PipelineBlueprint {
            detection: fixtures::detector_config(),
            ..Default::default()
        };
        blueprint.output.directory = output.display().to_string();
        blueprint.sinks = vec![
            SinkConfig::new("segments", SinkType::Csv),
            SinkConfig::new("events", SinkType::Events),
        ];

        PipelineConfig {
            blueprint,
            input: input.to_path_buf(),
            conditioning: false,
        }
    }

    #[test]
    fn test_batch_writes_outputs_and_counts_failures() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let devices = DeviceMap::default();

        fixtures::write_recordings(input.path(), &fixtures::jump_recording("P1"), &devices)
            .unwrap();
        fixtures::write_recordings(input.path(), &fixtures::flat_recording("P2"), &devices)
            .unwrap();
        fs::write(input.path().join("notes.txt"), "ignored").unwrap();

        let pipeline = Pipeline::new(config(input.path(), output.path())).unwrap();
        let stats = pipeline.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(stats.files_listed, 13);
        assert_eq!(stats.trials_ok(), 1);
        assert_eq!(stats.trials_failed(), 1);
        assert_eq!(stats.batch.failures_by_kind.get("event_not_found"), Some(&1));

        for name in [
            "P1-S1-acc-combined.csv",
            "P1-S1-gyro-combined.csv",
            "P1-S2-acc-combined.csv",
            "P1-S2-gyro-combined.csv",
        ] {
            assert!(output.path().join(name).exists(), "{name}");
        }
        assert!(!output.path().join("P2-S1-acc-combined.csv").exists());

        let table = fs::read_to_string(output.path().join("feature_list.csv")).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("P1,"));

        let events = fs::read_to_string(output.path().join("events.csv")).unwrap();
        assert_eq!(events.lines().count(), 2);
    }

    #[test]
    fn test_shutdown_before_first_trial() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fixtures::write_recordings(
            input.path(),
            &fixtures::jump_recording("P1"),
            &DeviceMap::default(),
        )
        .unwrap();

        let pipeline = Pipeline::new(config(input.path(), output.path())).unwrap();
        let stats = pipeline.run(&AtomicBool::new(true)).unwrap();

        assert!(stats.interrupted);
        assert_eq!(stats.trials_ok() + stats.trials_failed(), 0);
        assert!(!output.path().join("feature_list.csv").exists());
    }

    #[test]
    fn test_write_conditioned_streams() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fixtures::write_recordings(
            input.path(),
            &fixtures::jump_recording("P1"),
            &DeviceMap::default(),
        )
        .unwrap();

        let mut config = config(input.path(), output.path());
        config.blueprint.output.write_conditioned = true;
        let stats = Pipeline::new(config)
            .unwrap()
            .run(&AtomicBool::new(false))
            .unwrap();

        assert_eq!(stats.trials_ok(), 1);
        let conditioned = output.path().join("conditioned");
        assert!(conditioned.join("P1-LANK-acc.csv").exists());
        assert!(conditioned.join("P1-PELV-gyro.csv").exists());
    }

    #[test]
    fn test_missing_input_directory() {
        let output = tempfile::tempdir().unwrap();
        let missing = output.path().join("nope");
        let pipeline = Pipeline::new(config(&missing, output.path())).unwrap();
        assert!(pipeline.run(&AtomicBool::new(false)).is_err());
    }
}
