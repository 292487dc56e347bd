//! # Ingestion
//!
//! Sensor recording ingestion module.
//!
//! Responsibilities:
//! - Parse recording file names (participant, device serial, sensor kind)
//! - Group a sorted directory listing into trials
//! - Read sensor CSV files into `Stream`s
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{load_trial, TrialAssembler};
//!
//! let mut assembler = TrialAssembler::new(blueprint.devices.clone());
//! for path in ingestion::list_recordings(dir)? {
//!     if let Some(files) = assembler.push(&path) {
//!         let recording = load_trial(&files)?;
//!         // segment the trial
//!     }
//! }
//! ```

mod assembler;
mod error;
mod naming;
mod reader;

// Re-exports
pub use assembler::{
    assemble_directory, list_recordings, load_trial, SkipReason, SkippedFile, TrialAssembler,
    TrialFiles,
};
pub use error::{IngestionError, Result};
pub use naming::RecordingName;
pub use reader::{read_stream, write_stream, TIMESTAMP_COLUMN};
