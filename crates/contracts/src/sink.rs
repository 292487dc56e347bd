//! SegmentSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{ContractError, TrialOutput};

/// Trial output trait
///
/// All sink implementations must implement this trait. Trials arrive one
/// at a time in processing order; `finish` is called once after the batch.
pub trait SegmentSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one successfully segmented trial
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write_trial(&mut self, trial: &TrialOutput) -> Result<(), ContractError>;

    /// Flush anything accumulated across trials and close
    fn finish(&mut self) -> Result<(), ContractError>;
}
