//! Initial-contact detection on an ankle accelerometer.
//!
//! Two phases over the vertical axis: search forward for the landing spike,
//! then backtrack from the spike to the rising edge that precedes it.

use contracts::{Axis, Event, EventKind, Stream};

use crate::error::{Result, SegmentationError};

/// Finds the landing contact on `stream`, scanning from `start`.
///
/// Returns the first sample after the last sub-`onset` value preceding the
/// first value above `sensitivity`.
pub fn detect_initial_contact(
    stream: &Stream,
    kind: EventKind,
    start: usize,
    sensitivity: f64,
    onset: f64,
) -> Result<Event> {
    let channel = stream.channel();
    if start >= stream.len() {
        return Err(SegmentationError::StreamTooShort {
            channel,
            required: start + 1,
            actual: stream.len(),
        });
    }

    let vertical = |i: usize| stream.samples()[i].values.get(Axis::VERTICAL);

    let spike = (start..stream.len())
        .find(|&i| vertical(i) > sensitivity)
        .ok_or_else(|| {
            SegmentationError::not_found(
                kind,
                channel,
                format!("no vertical value above {sensitivity}"),
            )
        })?;

    let onset_index = (start..=spike)
        .rev()
        .find(|&i| vertical(i) < onset)
        .ok_or_else(|| {
            SegmentationError::not_found(
                kind,
                channel,
                format!("spike at {spike} has no onset below {onset} after {start}"),
            )
        })?;

    // onset above sensitivity lets the onset fall on the last sample
    let index = onset_index + 1;
    let timestamp = stream.timestamp(index).ok_or_else(|| {
        SegmentationError::not_found(
            kind,
            channel,
            format!("onset at {onset_index} is the last sample"),
        )
    })?;
    Ok(Event::new(kind, index, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Channel, Location, Sample, SensorKind};

    fn ankle(vertical: &[f64]) -> Stream {
        Stream::new(
            Channel::new(Location::LeftAnkle, SensorKind::Accelerometer),
            vertical
                .iter()
                .enumerate()
                .map(|(i, &z)| Sample::new(1_000 + i as i64 * 625, 0.0, 0.0, z))
                .collect(),
        )
    }

    #[test]
    fn test_returns_onset_not_spike() {
        // baseline, ramp through 15 and 60, spike, decay
        let mut signal = vec![9.8; 40];
        signal.extend([12.0, 18.0, 30.0, 45.0, 70.0, 120.0, 80.0, 20.0, 10.0, 9.8]);
        let stream = ankle(&signal);

        let event = detect_initial_contact(&stream, EventKind::LeftContact, 0, 60.0, 15.0).unwrap();
        // 40 is the last value below 15 before the spike
        assert_eq!(event.index, 41);
        assert_eq!(event.timestamp, 1_000 + 41 * 625);
        assert_eq!(event.kind, EventKind::LeftContact);
    }

    #[test]
    fn test_start_index_skips_earlier_spike() {
        let mut signal = vec![0.0; 10];
        signal[3] = 90.0;
        signal[7] = 20.0;
        signal[8] = 95.0;
        let stream = ankle(&signal);

        let event = detect_initial_contact(&stream, EventKind::RightContact, 5, 60.0, 15.0).unwrap();
        assert_eq!(event.index, 7);
    }

    #[test]
    fn test_no_spike_is_not_found() {
        let stream = ankle(&[10.0; 30]);
        let err = detect_initial_contact(&stream, EventKind::LeftContact, 0, 60.0, 15.0).unwrap_err();
        assert!(matches!(err, SegmentationError::EventNotFound { .. }));
    }

    #[test]
    fn test_backtrack_exhausts_at_start() {
        let stream = ankle(&[20.0, 30.0, 90.0, 10.0]);
        let err = detect_initial_contact(&stream, EventKind::LeftContact, 0, 60.0, 15.0).unwrap_err();
        assert!(matches!(err, SegmentationError::EventNotFound { .. }));
    }

    #[test]
    fn test_onset_on_last_sample_is_not_found() {
        // onset threshold above sensitivity: the spike is its own onset
        let stream = ankle(&[0.0, 0.0, 20.0]);
        let err = detect_initial_contact(&stream, EventKind::LeftContact, 0, 10.0, 60.0).unwrap_err();
        assert!(matches!(err, SegmentationError::EventNotFound { .. }));
    }

    #[test]
    fn test_start_past_end() {
        let stream = ankle(&[0.0; 4]);
        assert!(matches!(
            detect_initial_contact(&stream, EventKind::LeftContact, 4, 60.0, 15.0),
            Err(SegmentationError::StreamTooShort { required: 5, actual: 4, .. })
        ));
    }
}
