//! Segmentation 错误类型

use contracts::{Channel, EventKind, SegmentId};
use thiserror::Error;

/// Trial-scoped failure of event detection or segment building.
#[derive(Debug, Error)]
pub enum SegmentationError {
    /// A detector exhausted its search bound
    #[error("{event} not found on {channel}: {reason}")]
    EventNotFound {
        event: EventKind,
        channel: Channel,
        reason: String,
    },

    /// Not enough samples for a detector margin
    #[error("{channel} too short: needs {required} samples, has {actual}")]
    StreamTooShort {
        channel: Channel,
        required: usize,
        actual: usize,
    },

    #[error("{0} has no samples")]
    EmptyStream(Channel),

    #[error("{0} stream is missing")]
    MissingStream(Channel),

    /// Detected events violate take-off < contact < knee flexion
    #[error(
        "events out of order: take-off {take_off}, contacts {left_contact}/{right_contact}, knee flexion {knee_flexion}"
    )]
    EventOrder {
        take_off: i64,
        left_contact: i64,
        right_contact: i64,
        knee_flexion: i64,
    },

    #[error("segment {segment} of {channel} is empty ({start}..{end})")]
    EmptySegment {
        channel: Channel,
        segment: SegmentId,
        start: usize,
        end: usize,
    },

    #[error("segment {segment} of {channel} has {actual} samples, features need at least 2")]
    InsufficientSamples {
        channel: Channel,
        segment: SegmentId,
        actual: usize,
    },
}

impl SegmentationError {
    pub(crate) fn not_found(event: EventKind, channel: Channel, reason: impl Into<String>) -> Self {
        Self::EventNotFound {
            event,
            channel,
            reason: reason.into(),
        }
    }

    /// Short label for metrics and run summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EventNotFound { .. } => "event_not_found",
            Self::StreamTooShort { .. } => "stream_too_short",
            Self::EmptyStream(_) => "empty_stream",
            Self::MissingStream(_) => "missing_stream",
            Self::EventOrder { .. } => "event_order",
            Self::EmptySegment { .. } => "empty_segment",
            Self::InsufficientSamples { .. } => "insufficient_samples",
        }
    }
}

pub type Result<T> = std::result::Result<T, SegmentationError>;
