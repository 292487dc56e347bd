//! Segment building
//!
//! Slices every stream of a trial at the detected events and combines the
//! three locations of each segment and sensor kind into sentinel-padded
//! rows.

use contracts::{
    Channel, ChannelSegments, CombinedRow, CombinedSegment, Event, Location, Sample, SegmentId,
    SensorKind, Stream, TrialEvents, TrialRecording, Vector3,
};

use crate::error::{Result, SegmentationError};
use crate::timestamp_index::resolve;

/// Contact event that splits the segments of `location`.
///
/// Ankles use their own contact; the pelvis uses the earlier of the two.
pub fn contact_for(location: Location, events: &TrialEvents) -> Event {
    match location {
        Location::LeftAnkle => events.left_contact,
        Location::RightAnkle => events.right_contact,
        Location::Pelvis => events.first_contact(),
    }
}

/// Slices one stream into segment 1 `[take-off, contact)` and segment 2
/// `[contact, knee flexion)`.
pub fn segment_stream(stream: &Stream, events: &TrialEvents) -> Result<ChannelSegments> {
    let channel = stream.channel();
    let take_off = resolve(stream, &events.take_off)?;
    let contact = resolve(stream, &contact_for(channel.location, events))?;
    let flexion = resolve(stream, &events.knee_flexion)?;

    for (segment, start, end) in [
        (SegmentId::One, take_off, contact),
        (SegmentId::Two, contact, flexion),
    ] {
        if start >= end {
            return Err(SegmentationError::EmptySegment {
                channel,
                segment,
                start,
                end,
            });
        }
    }

    Ok(ChannelSegments {
        channel,
        one_range: (take_off, contact),
        two_range: (contact, flexion),
        one: stream.slice(take_off, contact),
        two: stream.slice(contact, flexion),
    })
}

/// Combines left, right and pelvis samples of one segment, padding the
/// shorter ones with sentinel rows up to the longest.
pub fn combine(
    segment: SegmentId,
    kind: SensorKind,
    left: &[Sample],
    right: &[Sample],
    pelvis: &[Sample],
) -> CombinedSegment {
    let rows = left.len().max(right.len()).max(pelvis.len());
    let at = |samples: &[Sample], i: usize| {
        samples
            .get(i)
            .map_or(Vector3::SENTINEL, |sample| sample.values)
    };

    CombinedSegment {
        segment,
        kind,
        source_lens: [left.len(), right.len(), pelvis.len()],
        rows: (0..rows)
            .map(|i| CombinedRow {
                left: at(left, i),
                right: at(right, i),
                pelvis: at(pelvis, i),
            })
            .collect(),
    }
}

/// Segments all six streams of `recording` and builds the four combined
/// records, ordered (S1, acc), (S1, gyro), (S2, acc), (S2, gyro).
pub fn build_segments(
    recording: &TrialRecording,
    events: &TrialEvents,
) -> Result<(Vec<ChannelSegments>, Vec<CombinedSegment>)> {
    let channels = Channel::all()
        .into_iter()
        .map(|channel| {
            let stream = recording
                .get(channel)
                .ok_or(SegmentationError::MissingStream(channel))?;
            segment_stream(stream, events)
        })
        .collect::<Result<Vec<_>>>()?;

    let find = |location: Location, kind: SensorKind| {
        channels
            .iter()
            .find(|c| c.channel == Channel::new(location, kind))
    };

    let mut combined = Vec::with_capacity(4);
    for segment in SegmentId::ALL {
        for kind in SensorKind::ALL {
            let [left, right, pelvis] = Location::ALL.map(|location| {
                find(location, kind).map_or(&[][..], |c| c.get(segment))
            });
            combined.push(combine(segment, kind, left, right, pelvis));
        }
    }

    Ok((channels, combined))
}
