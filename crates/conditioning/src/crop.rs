//! 跳跃窗口裁剪
//!
//! The left ankle anteroposterior accelerometer channel marks the jump:
//! the first sample below the impact threshold opens the window, each later
//! one extends it, and the scan ends once `window_samples` samples pass
//! without another crossing. The padded window is applied to all six
//! streams by timestamp.

use contracts::{Axis, Channel, CropConfig, Location, SensorKind, Stream, TrialRecording};
use tracing::debug;

use crate::error::{ConditioningError, Result};

/// Stream whose impacts define the crop window.
pub const CROP_REFERENCE: Channel = Channel::new(Location::LeftAnkle, SensorKind::Accelerometer);

/// First and last impact sample indices in `stream`.
pub fn find_impact_window(stream: &Stream, config: &CropConfig) -> Result<(usize, usize)> {
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut since_last = 0;

    for (index, sample) in stream.samples().iter().enumerate() {
        let value = sample.values.get(Axis::ANTEROPOSTERIOR);
        if start.is_some() {
            since_last += 1;
        }

        if value < config.impact_threshold {
            if start.is_none() {
                start = Some(index);
            }
            end = index;
            since_last = 0;
        }

        if since_last == config.window_samples {
            break;
        }
    }

    start
        .map(|start| (start, end))
        .ok_or(ConditioningError::NoImpactFound {
            channel: stream.channel(),
            threshold: config.impact_threshold,
        })
}

/// Timestamps bounding the padded crop window, clamped to the stream.
pub fn crop_bounds(stream: &Stream, config: &CropConfig) -> Result<(i64, i64)> {
    let (start, end) = find_impact_window(stream, config)?;
    let last = stream.len().saturating_sub(1);
    let from = start.saturating_sub(config.window_samples);
    let to = end.saturating_add(config.window_samples).min(last);

    match (stream.timestamp(from), stream.timestamp(to)) {
        (Some(from), Some(to)) => Ok((from, to)),
        _ => Err(ConditioningError::EmptyCrop {
            channel: stream.channel(),
        }),
    }
}

/// Keeps samples of `stream` from the one closest to `from` up to, but
/// excluding, the one closest to `to`.
pub fn crop_stream(stream: &Stream, from: i64, to: i64) -> Result<Stream> {
    let empty = || ConditioningError::EmptyCrop {
        channel: stream.channel(),
    };
    let begin = stream.closest_index(from).ok_or_else(empty)?;
    let end = stream.closest_index(to).ok_or_else(empty)?;
    if begin >= end {
        return Err(empty());
    }
    Ok(Stream::new(stream.channel(), stream.slice(begin, end)))
}

/// Crops every stream of `recording` to the jump window.
pub fn crop_trial(recording: TrialRecording, config: &CropConfig) -> Result<TrialRecording> {
    let reference = recording
        .get(CROP_REFERENCE)
        .ok_or(ConditioningError::MissingReference(CROP_REFERENCE))?;
    let (from, to) = crop_bounds(reference, config)?;
    debug!(participant = %recording.participant(), from, to, "crop window");

    recording.try_map_streams(|stream| crop_stream(&stream, from, to))
}
