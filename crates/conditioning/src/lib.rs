//! # Conditioning
//!
//! Signal pre-processing applied to a loaded trial before event detection:
//!
//! 1. axis alignment into the body frame
//! 2. cropping to the jump window
//! 3. Butterworth low-pass filtering
//!
//! Each step can be switched off through `ConditioningConfig`.

mod align;
mod crop;
mod error;
mod filter;

pub use align::{align, body_frame};
pub use crop::{crop_bounds, crop_stream, crop_trial, find_impact_window, CROP_REFERENCE};
pub use error::{ConditioningError, Result};
pub use filter::{Biquad, ButterworthLowpass};

use contracts::{ConditioningConfig, CropConfig, SensorKind, TrialRecording};
use tracing::{debug, instrument};

/// Applies the configured conditioning steps to whole trials.
#[derive(Debug, Clone)]
pub struct Conditioner {
    align: bool,
    crop: Option<CropConfig>,
    accelerometer_filter: Option<ButterworthLowpass>,
    gyroscope_filter: Option<ButterworthLowpass>,
}

impl Conditioner {
    /// Builds the filters up front so a bad design fails before any trial.
    pub fn from_config(config: &ConditioningConfig) -> Result<Self> {
        let (accelerometer_filter, gyroscope_filter) = if config.filter.enabled {
            let design = |kind: SensorKind| {
                ButterworthLowpass::design(
                    config.filter.order,
                    config.filter.cutoff_hz,
                    config.filter.sample_rate(kind),
                )
            };
            (
                Some(design(SensorKind::Accelerometer)?),
                Some(design(SensorKind::Gyroscope)?),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            align: config.align,
            crop: config.crop.enabled.then(|| config.crop.clone()),
            accelerometer_filter,
            gyroscope_filter,
        })
    }

    /// A conditioner that leaves trials untouched.
    pub fn passthrough() -> Self {
        Self {
            align: false,
            crop: None,
            accelerometer_filter: None,
            gyroscope_filter: None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        !self.align
            && self.crop.is_none()
            && self.accelerometer_filter.is_none()
            && self.gyroscope_filter.is_none()
    }

    #[instrument(name = "condition_trial", skip_all, fields(participant = %recording.participant()))]
    pub fn condition(&self, mut recording: TrialRecording) -> Result<TrialRecording> {
        if self.align {
            recording =
                recording.try_map_streams(|stream| Ok::<_, ConditioningError>(align(&stream)))?;
            debug!("aligned");
        }

        if let Some(crop) = &self.crop {
            recording = crop_trial(recording, crop)?;
            debug!("cropped");
        }

        if self.accelerometer_filter.is_some() || self.gyroscope_filter.is_some() {
            recording = recording.try_map_streams(|stream| {
                let filter = match stream.channel().kind {
                    SensorKind::Accelerometer => &self.accelerometer_filter,
                    SensorKind::Gyroscope => &self.gyroscope_filter,
                };
                Ok::<_, ConditioningError>(match filter {
                    Some(filter) => filter.filter_stream(&stream),
                    None => stream,
                })
            })?;
            debug!("filtered");
        }

        Ok(recording)
    }
}
