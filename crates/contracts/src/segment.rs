//! Segment outputs - segmentation 输出
//!
//! Segment 1 runs from take-off to initial contact, segment 2 from initial
//! contact to maximum knee flexion.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Channel, FeatureRecord, Location, ParticipantId, Sample, SensorKind, TrialEvents, Vector3};

/// Segment number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentId {
    /// Take-off to initial contact (flight)
    One,
    /// Initial contact to maximum knee flexion (landing)
    Two,
}

impl SegmentId {
    pub const ALL: [SegmentId; 2] = [SegmentId::One, SegmentId::Two];

    pub fn label(self) -> &'static str {
        match self {
            SegmentId::One => "S1",
            SegmentId::Two => "S2",
        }
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Both unpadded segments of one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSegments {
    pub channel: Channel,
    /// Index range `[start, end)` of segment 1 in the source stream
    pub one_range: (usize, usize),
    /// Index range `[start, end)` of segment 2 in the source stream
    pub two_range: (usize, usize),
    pub one: Vec<Sample>,
    pub two: Vec<Sample>,
}

impl ChannelSegments {
    pub fn get(&self, segment: SegmentId) -> &[Sample] {
        match segment {
            SegmentId::One => &self.one,
            SegmentId::Two => &self.two,
        }
    }
}

/// One row of a combined segment file: three axes for each location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub left: Vector3,
    pub right: Vector3,
    pub pelvis: Vector3,
}

impl CombinedRow {
    pub fn get(&self, location: Location) -> Vector3 {
        match location {
            Location::LeftAnkle => self.left,
            Location::RightAnkle => self.right,
            Location::Pelvis => self.pelvis,
        }
    }
}

/// Left, right and pelvis streams of one segment and sensor kind, padded to
/// a common row count with sentinel rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSegment {
    pub segment: SegmentId,
    pub kind: SensorKind,
    /// Unpadded row count per location (left, right, pelvis)
    pub source_lens: [usize; 3],
    pub rows: Vec<CombinedRow>,
}

impl CombinedSegment {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// CSV header in column order.
    pub fn header(kind: SensorKind) -> Vec<String> {
        Location::ALL
            .iter()
            .flat_map(|&location| {
                crate::Axis::ALL
                    .iter()
                    .map(move |&axis| Channel::new(location, kind).combined_column(axis))
            })
            .collect()
    }

    /// Output file name: `<participant>-S1-acc-combined.csv`.
    pub fn file_name(&self, participant: &ParticipantId) -> String {
        format!(
            "{}-{}-{}-combined.csv",
            participant.file_stem(),
            self.segment.label(),
            self.kind.tag()
        )
    }
}

/// Everything a trial produces, handed to the sinks.
#[derive(Debug, Clone)]
pub struct TrialOutput {
    pub participant: ParticipantId,
    pub events: TrialEvents,
    /// Unpadded segments for all six channels
    pub channels: Vec<ChannelSegments>,
    /// Four combined records: (S1, S2) x (acc, gyro)
    pub combined: Vec<CombinedSegment>,
    pub features: FeatureRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_order() {
        let header = CombinedSegment::header(SensorKind::Accelerometer);
        assert_eq!(header.len(), 9);
        assert_eq!(header[0], "lax_m/s/s");
        assert_eq!(header[4], "ray_m/s/s");
        assert_eq!(header[8], "paz_m/s/s");

        let header = CombinedSegment::header(SensorKind::Gyroscope);
        assert_eq!(header[3], "rgx_deg/s");
    }

    #[test]
    fn test_file_name() {
        let segment = CombinedSegment {
            segment: SegmentId::Two,
            kind: SensorKind::Gyroscope,
            source_lens: [0, 0, 0],
            rows: Vec::new(),
        };
        let participant: ParticipantId = "P 1".into();
        assert_eq!(segment.file_name(&participant), "P1-S2-gyro-combined.csv");
    }
}
