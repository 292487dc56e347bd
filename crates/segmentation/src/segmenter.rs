//! TrialSegmenter - 单次试验的检测与分段
//!
//! Runs the detectors in order on one trial, checks event ordering, then
//! builds segments and features.

use contracts::{
    Channel, DetectorConfig, EventKind, Location, SensorKind, Stream, TrialEvents, TrialOutput,
    TrialRecording,
};
use tracing::{debug, instrument};

use crate::builder::build_segments;
use crate::error::{Result, SegmentationError};
use crate::features::extract_features;
use crate::initial_contact::detect_initial_contact;
use crate::knee_flexion::detect_knee_flexion;
use crate::take_off::detect_take_off;
use crate::timestamp_index::closest_index;

/// Detects events and builds segments for one trial at a time.
///
/// Holds no per-trial state; one instance serves a whole batch.
#[derive(Debug, Clone, Default)]
pub struct TrialSegmenter {
    config: DetectorConfig,
}

impl TrialSegmenter {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detects the four events of `recording`.
    #[instrument(name = "detect_events", skip_all, fields(participant = %recording.participant()))]
    pub fn detect(&self, recording: &TrialRecording) -> Result<TrialEvents> {
        let left = accelerometer(recording, Location::LeftAnkle)?;
        let right = accelerometer(recording, Location::RightAnkle)?;
        let pelvis = accelerometer(recording, Location::Pelvis)?;
        let config = &self.config;

        let contact = |ankle: &Stream, kind: EventKind| {
            detect_initial_contact(
                ankle,
                kind,
                0,
                config.contact_sensitivity,
                config.contact_onset_threshold,
            )
        };
        let left_contact = contact(left, EventKind::LeftContact)?;
        let right_contact = contact(right, EventKind::RightContact)?;
        debug!(left = left_contact.index, right = right_contact.index, "initial contacts");

        let take_off = detect_take_off(
            pelvis,
            left_contact.timestamp,
            config.take_off_search_offset,
            config.take_off_deceleration_threshold,
        )?;
        debug!(index = take_off.index, timestamp = take_off.timestamp, "take-off");

        let lower = closest_index(pelvis, left_contact.timestamp)?;
        let knee_flexion = detect_knee_flexion(pelvis, lower, config)?;
        debug!(
            index = knee_flexion.index,
            timestamp = knee_flexion.timestamp,
            "knee flexion"
        );

        let events = TrialEvents {
            take_off,
            left_contact,
            right_contact,
            knee_flexion,
        };
        if !events.is_ordered() {
            return Err(SegmentationError::EventOrder {
                take_off: take_off.timestamp,
                left_contact: left_contact.timestamp,
                right_contact: right_contact.timestamp,
                knee_flexion: knee_flexion.timestamp,
            });
        }
        Ok(events)
    }

    /// Detects events, builds segments and extracts features.
    #[instrument(name = "segment_trial", skip_all, fields(participant = %recording.participant()))]
    pub fn segment(&self, recording: &TrialRecording) -> Result<TrialOutput> {
        let events = self.detect(recording)?;
        let (channels, combined) = build_segments(recording, &events)?;
        let features = extract_features(recording.participant(), &events, &channels)?;

        debug!(
            features = features.values.len(),
            rows = ?combined.iter().map(|c| c.len()).collect::<Vec<_>>(),
            "trial segmented"
        );

        Ok(TrialOutput {
            participant: recording.participant().clone(),
            events,
            channels,
            combined,
            features,
        })
    }
}

fn accelerometer(recording: &TrialRecording, location: Location) -> Result<&Stream> {
    let channel = Channel::new(location, SensorKind::Accelerometer);
    let stream = recording
        .get(channel)
        .ok_or(SegmentationError::MissingStream(channel))?;
    if stream.is_empty() {
        return Err(SegmentationError::EmptyStream(channel));
    }
    Ok(stream)
}
