//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Sample timestamps are Unix microseconds (`i64`), increasing within a
//!   stream but not on a fixed grid
//! - Streams never share an index space; cross-stream lookups go through
//!   timestamps

mod blueprint;
mod detector_config;
mod error;
mod event;
mod feature;
mod participant_id;
mod sample;
mod segment;
mod sink;
mod trial;

pub use blueprint::*;
pub use detector_config::*;
pub use error::*;
pub use event::*;
pub use feature::*;
pub use participant_id::ParticipantId;
pub use sample::*;
pub use segment::*;
pub use sink::*;
pub use trial::TrialRecording;
