//! Maximum-knee-flexion detection on the pelvis accelerometer.
//!
//! A single cursor starts a fixed margin after initial contact and moves
//! through three searches:
//!
//! 1. forward until the anteroposterior value exceeds the recovery threshold
//! 2. backward to the local maximum of the vertical axis
//! 3. backward to the local minimum of the anteroposterior axis
//!
//! The backward searches stop once a number of consecutive samples bring no
//! new extremum or the cursor reaches `lower`. Every stage stays inside
//! `[lower, len - tail]`.

use contracts::{Axis, DetectorConfig, Event, EventKind, Stream};
use tracing::trace;

use crate::error::{Result, SegmentationError};

/// Which extremum a stall search tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    #[inline]
    fn improves(self, candidate: f64, best: f64) -> bool {
        match self {
            Extremum::Min => candidate < best,
            Extremum::Max => candidate > best,
        }
    }
}

/// Backward search from `from` for a local extremum on `axis`.
///
/// The running best resets a stall counter on every strict improvement;
/// the search ends when the counter reaches `stall_limit` or the cursor
/// reaches `lower`. The starting sample counts as the first non-improving
/// step. Returns `None` only when `from` is out of range.
pub fn stall_search(
    stream: &Stream,
    from: usize,
    lower: usize,
    axis: Axis,
    extremum: Extremum,
    stall_limit: usize,
) -> Option<usize> {
    let samples = stream.samples();
    let mut best_index = from;
    let mut best = samples.get(from)?.values.get(axis);
    let mut stall = 0;
    let mut cursor = from;

    loop {
        let value = samples[cursor].values.get(axis);
        if extremum.improves(value, best) {
            best = value;
            best_index = cursor;
            stall = 0;
        } else {
            stall += 1;
        }

        if stall >= stall_limit || cursor <= lower {
            return Some(best_index);
        }
        cursor -= 1;
    }
}

/// Finds maximum knee flexion on `pelvis`; `lower` is the initial-contact
/// index resolved on this stream.
pub fn detect_knee_flexion(pelvis: &Stream, lower: usize, config: &DetectorConfig) -> Result<Event> {
    let channel = pelvis.channel();
    let len = pelvis.len();

    let upper = len
        .checked_sub(config.flexion_tail_margin)
        .ok_or(SegmentationError::StreamTooShort {
            channel,
            required: config.flexion_tail_margin,
            actual: len,
        })?;
    let start = lower + config.flexion_landing_margin;
    if start > upper {
        return Err(SegmentationError::StreamTooShort {
            channel,
            required: start + config.flexion_tail_margin,
            actual: len,
        });
    }

    let not_found = |reason: String| SegmentationError::not_found(EventKind::KneeFlexion, channel, reason);

    // upper == len when the tail margin is zero
    let recovery = (start..=upper)
        .find(|&i| {
            pelvis
                .value(i, Axis::ANTEROPOSTERIOR)
                .is_some_and(|ap| ap > config.flexion_recovery_threshold)
        })
        .ok_or_else(|| {
            not_found(format!(
                "anteroposterior value never exceeds {} in [{start}, {upper}]",
                config.flexion_recovery_threshold
            ))
        })?;

    let peak = stall_search(
        pelvis,
        recovery,
        lower,
        Axis::VERTICAL,
        Extremum::Max,
        config.flexion_stall_samples,
    )
    .ok_or_else(|| not_found(format!("vertical maximum search from {recovery} left the stream")))?;

    let trough = stall_search(
        pelvis,
        peak,
        lower,
        Axis::ANTEROPOSTERIOR,
        Extremum::Min,
        config.flexion_stall_samples,
    )
    .ok_or_else(|| not_found(format!("anteroposterior minimum search from {peak} left the stream")))?;

    trace!(recovery, peak, trough, "knee flexion stages");
    Ok(Event::new(
        EventKind::KneeFlexion,
        trough,
        pelvis.samples()[trough].timestamp,
    ))
}
