//! DetectorConfig - 事件检测参数
//!
//! Sample margins and thresholds calibrated for 1600 Hz accelerometer /
//! 1125 Hz gyroscope recordings. Defaults must stay exactly as listed.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Thresholds and sample margins shared by all event detectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DetectorConfig {
    /// Vertical acceleration that marks a landing spike (m/s²)
    pub contact_sensitivity: f64,

    /// Backtracking stops once the vertical value drops below this (m/s²)
    pub contact_onset_threshold: f64,

    /// Samples stepped back from the contact anchor before the take-off scan
    pub take_off_search_offset: usize,

    /// Anteroposterior value bounding the pre-take-off deceleration (m/s²)
    pub take_off_deceleration_threshold: f64,

    /// Samples skipped after initial contact before the knee-flexion search
    pub flexion_landing_margin: usize,

    /// Samples excluded at the end of the pelvis stream
    pub flexion_tail_margin: usize,

    /// Anteroposterior value that marks squat recovery (m/s²)
    pub flexion_recovery_threshold: f64,

    /// Consecutive samples without a new extremum that end a local search
    #[validate(range(min = 1))]
    pub flexion_stall_samples: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contact_sensitivity: 60.0,
            contact_onset_threshold: 15.0,
            take_off_search_offset: 300,
            take_off_deceleration_threshold: -10.0,
            flexion_landing_margin: 500,
            flexion_tail_margin: 1500,
            flexion_recovery_threshold: 2.0,
            flexion_stall_samples: 50,
        }
    }
}
