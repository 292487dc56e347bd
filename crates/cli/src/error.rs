//! Error types for per-trial processing.

use conditioning::ConditioningError;
use dispatcher::DispatcherError;
use ingestion::IngestionError;
use segmentation::SegmentationError;
use thiserror::Error;

/// Why one trial did not make it through the pipeline.
///
/// Trial errors are logged and counted; they never abort the batch.
#[derive(Error, Debug)]
pub enum TrialError {
    #[error("loading failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("conditioning failed: {0}")]
    Conditioning(#[from] ConditioningError),

    #[error("segmentation failed: {0}")]
    Segmentation(#[from] SegmentationError),

    #[error("output failed: {0}")]
    Dispatch(#[from] DispatcherError),
}

impl TrialError {
    /// Short label for metrics and the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            TrialError::Ingestion(e) => e.kind(),
            TrialError::Conditioning(e) => e.kind(),
            TrialError::Segmentation(e) => e.kind(),
            TrialError::Dispatch(_) => "sink_write",
        }
    }
}
