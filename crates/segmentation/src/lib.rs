//! # Segmentation
//!
//! 跳跃事件检测与分段。
//!
//! 负责：
//! - initial contact per ankle, take-off and maximum knee flexion on the pelvis
//! - slicing all six streams into segment 1 and segment 2
//! - sentinel padding into combined records
//! - statistical and temporal features
//!
//! Streams never share a sample grid. Events carry the index on the stream
//! they were detected on plus a timestamp; every other stream re-resolves
//! them through [`closest_index`].
//!
//! ## 使用示例
//!
//! ```ignore
//! use segmentation::TrialSegmenter;
//!
//! let segmenter = TrialSegmenter::new(blueprint.detection.clone());
//! match segmenter.segment(&recording) {
//!     Ok(output) => dispatcher.dispatch(&output)?,
//!     Err(e) => warn!(error = %e, "trial failed"),
//! }
//! ```

mod builder;
mod error;
mod features;
mod initial_contact;
mod knee_flexion;
mod segmenter;
mod take_off;
mod timestamp_index;

pub use builder::{build_segments, combine, contact_for, segment_stream};
pub use error::{Result, SegmentationError};
pub use features::{extract_features, temporal_features, AxisStats};
pub use initial_contact::detect_initial_contact;
pub use knee_flexion::{detect_knee_flexion, stall_search, Extremum};
pub use segmenter::TrialSegmenter;
pub use take_off::detect_take_off;
pub use timestamp_index::{closest_index, resolve};
