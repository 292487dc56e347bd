//! Feature extraction from unpadded segments.
//!
//! Column order: five temporal features, then every segment 1 statistic,
//! then every segment 2 statistic. Within a segment the order is location
//! (left, right, pelvis), sensor kind (acc, gyro), axis (x, y, z), statistic.

use contracts::{
    Axis, Channel, ChannelSegments, FeatureRecord, Location, ParticipantId, SegmentId, SensorKind,
    TrialEvents,
};

use crate::error::{Result, SegmentationError};

/// Statistics computed per segment, location, kind and axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStats {
    pub rms: f64,
    /// Population variance
    pub variance: f64,
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    pub max: f64,
    pub min: f64,
}

impl AxisStats {
    /// Suffixes in output order.
    pub const NAMES: [&'static str; 6] = ["rms", "variance", "valueMean", "stdDev", "maxima", "minima"];

    /// `None` for fewer than two values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let squares = values.iter().map(|v| v * v).sum::<f64>();
        let deviation = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();

        Some(Self {
            rms: (squares / n).sqrt(),
            variance: deviation / n,
            mean,
            std_dev: (deviation / (n - 1.0)).sqrt(),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
        })
    }

    pub fn values(&self) -> [f64; 6] {
        [self.rms, self.variance, self.mean, self.std_dev, self.max, self.min]
    }
}

/// Temporal features in microseconds, in output order.
pub fn temporal_features(events: &TrialEvents) -> [(&'static str, f64); 5] {
    let take_off = events.take_off.timestamp;
    let left = events.left_contact.timestamp;
    let right = events.right_contact.timestamp;
    let flexion = events.knee_flexion.timestamp;
    [
        ("takeOff_flight_time_left", (left - take_off) as f64),
        ("takeOff_flight_time_right", (right - take_off) as f64),
        ("takeOff_time_to_flexion", (flexion - take_off) as f64),
        ("segment2_time_from_left", (flexion - left) as f64),
        ("segment2_time_from_right", (flexion - right) as f64),
    ]
}

/// Feature name prefix, e.g. `S1_LANK_ax_m/s/s`.
fn prefix(segment: SegmentId, channel: Channel, axis: Axis) -> String {
    format!(
        "{}_{}_{}",
        segment.label(),
        channel.location.label(),
        channel.kind.column(axis)
    )
}

/// Builds the full feature row of one trial.
pub fn extract_features(
    participant: &ParticipantId,
    events: &TrialEvents,
    channels: &[ChannelSegments],
) -> Result<FeatureRecord> {
    let mut record = FeatureRecord::new(participant.clone());
    for (name, value) in temporal_features(events) {
        record.push(name, value);
    }

    for segment in SegmentId::ALL {
        for location in Location::ALL {
            for kind in SensorKind::ALL {
                let channel = Channel::new(location, kind);
                let samples = channels
                    .iter()
                    .find(|c| c.channel == channel)
                    .ok_or(SegmentationError::MissingStream(channel))?
                    .get(segment);

                for axis in Axis::ALL {
                    let values: Vec<f64> = samples.iter().map(|s| s.values.get(axis)).collect();
                    let stats = AxisStats::compute(&values).ok_or(
                        SegmentationError::InsufficientSamples {
                            channel,
                            segment,
                            actual: values.len(),
                        },
                    )?;

                    let prefix = prefix(segment, channel, axis);
                    for (name, value) in AxisStats::NAMES.iter().zip(stats.values()) {
                        record.push(format!("{prefix}_{name}"), value);
                    }
                }
            }
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use contracts::{Event, EventKind, Sample};

    #[test]
    fn test_axis_stats() {
        let stats = AxisStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.variance, 4.0);
        assert_relative_eq!(stats.std_dev, (32.0f64 / 7.0).sqrt());
        assert_relative_eq!(stats.rms, (232.0f64 / 8.0).sqrt());
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.min, 2.0);

        assert!(AxisStats::compute(&[1.0]).is_none());
    }

    fn events() -> TrialEvents {
        TrialEvents {
            take_off: Event::new(EventKind::TakeOff, 10, 1_000),
            left_contact: Event::new(EventKind::LeftContact, 50, 5_000),
            right_contact: Event::new(EventKind::RightContact, 52, 5_200),
            knee_flexion: Event::new(EventKind::KneeFlexion, 300, 30_000),
        }
    }

    fn channels(len: usize) -> Vec<ChannelSegments> {
        Channel::all()
            .into_iter()
            .map(|channel| {
                let make = |offset: f64| {
                    (0..len)
                        .map(|i| Sample::new(i as i64, offset + i as f64, 0.0, -1.0))
                        .collect::<Vec<_>>()
                };
                ChannelSegments {
                    channel,
                    one_range: (0, len),
                    two_range: (len, 2 * len),
                    one: make(0.0),
                    two: make(10.0),
                }
            })
            .collect()
    }

    #[test]
    fn test_feature_row_layout() {
        let record = extract_features(&"P1".into(), &events(), &channels(3)).unwrap();
        // 5 temporal + 2 segments x 6 channels x 3 axes x 6 statistics
        assert_eq!(record.values.len(), 5 + 2 * 6 * 3 * 6);

        let names: Vec<&str> = record.names().collect();
        assert_eq!(names[0], "takeOff_flight_time_left");
        assert_eq!(names[5], "S1_LANK_ax_m/s/s_rms");
        assert_eq!(names[5 + 18], "S1_LANK_gx_deg/s_rms");
        assert_eq!(names[5 + 36], "S1_RANK_ax_m/s/s_rms");
        assert_eq!(names[5 + 108], "S2_LANK_ax_m/s/s_rms");
        assert_eq!(*names.last().unwrap(), "S2_PELV_gz_deg/s_minima");

        assert_eq!(record.get("takeOff_flight_time_right"), Some(4_200.0));
        assert_eq!(record.get("segment2_time_from_left"), Some(25_000.0));
        assert_eq!(record.get("S1_PELV_ax_m/s/s_maxima"), Some(2.0));
        assert_eq!(record.get("S2_PELV_gx_deg/s_valueMean"), Some(11.0));
        assert_eq!(record.get("S1_RANK_az_m/s/s_stdDev"), Some(0.0));
    }

    #[test]
    fn test_single_sample_segment_is_rejected() {
        let err = extract_features(&"P1".into(), &events(), &channels(1)).unwrap_err();
        assert!(matches!(
            err,
            SegmentationError::InsufficientSamples { actual: 1, segment: SegmentId::One, .. }
        ));
    }
}
