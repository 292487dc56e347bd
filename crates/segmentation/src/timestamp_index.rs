//! Cross-stream index lookup
//!
//! Streams of a trial never share a sample grid, so an event found on one
//! stream is carried to another by its timestamp.

use contracts::{Event, Stream};

use crate::error::{Result, SegmentationError};

/// Index of the sample of `stream` closest to `timestamp`.
#[inline]
pub fn closest_index(stream: &Stream, timestamp: i64) -> Result<usize> {
    stream
        .closest_index(timestamp)
        .ok_or(SegmentationError::EmptyStream(stream.channel()))
}

/// Index of `event` in `stream`: the detected index on its own stream,
/// otherwise the closest timestamp.
pub fn resolve(stream: &Stream, event: &Event) -> Result<usize> {
    if event.kind.source_channel() == stream.channel() && event.index < stream.len() {
        Ok(event.index)
    } else {
        closest_index(stream, event.timestamp)
    }
}
