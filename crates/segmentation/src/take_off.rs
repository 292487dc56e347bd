//! Take-off detection on the pelvis accelerometer.
//!
//! The contact timestamp of an ankle anchors the search. From a fixed offset
//! before the anchor the anteroposterior minimum is located, then the
//! deceleration phase around it is walked back to its start. A minimum that
//! never drops below the threshold is its own start.

use contracts::{Axis, Event, EventKind, Stream};

use crate::error::{Result, SegmentationError};
use crate::timestamp_index::closest_index;

/// Finds take-off on `pelvis` given an ankle contact timestamp.
pub fn detect_take_off(
    pelvis: &Stream,
    anchor_timestamp: i64,
    search_offset: usize,
    deceleration_threshold: f64,
) -> Result<Event> {
    let channel = pelvis.channel();
    let anchor = closest_index(pelvis, anchor_timestamp)?;
    let start = anchor
        .checked_sub(search_offset)
        .ok_or(SegmentationError::StreamTooShort {
            channel,
            required: search_offset,
            actual: anchor,
        })?;

    let ap = |i: usize| pelvis.samples()[i].values.get(Axis::ANTEROPOSTERIOR);

    // Backward scan; strict comparison keeps the latest of equal minima
    let mut min_index = start;
    for i in (0..start).rev() {
        if ap(i) < ap(min_index) {
            min_index = i;
        }
    }

    let mut cursor = min_index;
    while ap(cursor) < deceleration_threshold {
        if cursor == 0 {
            return Err(SegmentationError::not_found(
                EventKind::TakeOff,
                channel,
                "deceleration phase runs to the start of the stream",
            ));
        }
        cursor -= 1;
    }

    let index = cursor + 1;
    Ok(Event::new(EventKind::TakeOff, index, pelvis.samples()[index].timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Channel, Location, Sample, SensorKind};

    fn pelvis(ap: &[f64]) -> Stream {
        Stream::new(
            Channel::new(Location::Pelvis, SensorKind::Accelerometer),
            ap.iter()
                .enumerate()
                .map(|(i, &y)| Sample::new(i as i64 * 625, 0.0, y, 9.8))
                .collect(),
        )
    }

    /// Flat at 0 with a dip to -30 at `k`, below -10 on `[k - 4, k + 4]`.
    fn dip(len: usize, k: usize) -> Vec<f64> {
        let mut signal = vec![0.0; len];
        for i in k - 4..=k + 4 {
            signal[i] = -30.0 + 4.0 * i.abs_diff(k) as f64;
        }
        signal[k - 5] = -5.0;
        signal
    }

    #[test]
    fn test_take_off_is_one_past_threshold_crossing() {
        let k = 40;
        let stream = pelvis(&dip(200, k));
        // k - 5 is the last value at or above -10 walking back from the minimum
        let anchor = stream.timestamp(150).unwrap();
        let event = detect_take_off(&stream, anchor, 100, -10.0).unwrap();
        assert_eq!(event.kind, EventKind::TakeOff);
        assert_eq!(event.index, k - 4);
        assert_eq!(event.timestamp, (k as i64 - 4) * 625);
    }

    #[test]
    fn test_later_dip_after_search_start_is_ignored() {
        let mut signal = dip(300, 40);
        // deeper dip past the search start
        signal[260] = -80.0;
        let stream = pelvis(&signal);
        let anchor = stream.timestamp(280).unwrap();
        let event = detect_take_off(&stream, anchor, 100, -10.0).unwrap();
        assert_eq!(event.index, 36);
    }

    #[test]
    fn test_anchor_too_close_to_start() {
        let stream = pelvis(&[0.0; 50]);
        let err = detect_take_off(&stream, stream.timestamp(20).unwrap(), 300, -10.0).unwrap_err();
        assert!(matches!(
            err,
            SegmentationError::StreamTooShort { required: 300, actual: 20, .. }
        ));
    }

    #[test]
    fn test_shallow_minimum_is_its_own_start() {
        let mut signal = vec![0.0; 200];
        signal[30] = -6.0;
        let stream = pelvis(&signal);
        let event = detect_take_off(&stream, stream.timestamp(150).unwrap(), 100, -10.0).unwrap();
        assert_eq!(event.index, 31);
        assert_eq!(event.timestamp, 31 * 625);
    }

    #[test]
    fn test_flat_signal_takes_off_after_search_start() {
        // equal minima keep the search start
        let stream = pelvis(&vec![-2.0; 100]);
        let event = detect_take_off(&stream, stream.timestamp(90).unwrap(), 10, -10.0).unwrap();
        assert_eq!(event.index, 81);
    }

    #[test]
    fn test_deceleration_from_stream_start_is_not_found() {
        let mut signal = vec![0.0; 100];
        signal[..6].copy_from_slice(&[-20.0, -25.0, -30.0, -20.0, -12.0, -11.0]);
        let stream = pelvis(&signal);
        let err = detect_take_off(&stream, stream.timestamp(80).unwrap(), 10, -10.0).unwrap_err();
        assert!(matches!(err, SegmentationError::EventNotFound { .. }));
    }
}
