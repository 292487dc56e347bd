//! 传感器 CSV 读写
//!
//! Columns: `unix_timestamp_microsec` followed by `ax_m/s/s,ay_m/s/s,az_m/s/s`
//! (accelerometer) or `gx_deg/s,gy_deg/s,gz_deg/s` (gyroscope). Extra
//! columns are ignored.

use std::path::Path;

use contracts::{Axis, Channel, Sample, SensorKind, Stream};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{IngestionError, Result};

pub const TIMESTAMP_COLUMN: &str = "unix_timestamp_microsec";

#[derive(Debug, Deserialize)]
struct AccelRow {
    #[serde(rename = "unix_timestamp_microsec")]
    timestamp: i64,
    #[serde(rename = "ax_m/s/s")]
    x: f64,
    #[serde(rename = "ay_m/s/s")]
    y: f64,
    #[serde(rename = "az_m/s/s")]
    z: f64,
}

#[derive(Debug, Deserialize)]
struct GyroRow {
    #[serde(rename = "unix_timestamp_microsec")]
    timestamp: i64,
    #[serde(rename = "gx_deg/s")]
    x: f64,
    #[serde(rename = "gy_deg/s")]
    y: f64,
    #[serde(rename = "gz_deg/s")]
    z: f64,
}

impl From<AccelRow> for Sample {
    fn from(row: AccelRow) -> Self {
        Sample::new(row.timestamp, row.x, row.y, row.z)
    }
}

impl From<GyroRow> for Sample {
    fn from(row: GyroRow) -> Self {
        Sample::new(row.timestamp, row.x, row.y, row.z)
    }
}

/// Reads one recording into a [`Stream`] for `channel`.
///
/// # Errors
/// Unreadable file, malformed row, backwards timestamp or zero rows.
#[instrument(name = "read_stream", skip_all, fields(path = %path.display(), channel = %channel))]
pub fn read_stream(path: &Path, channel: Channel) -> Result<Stream> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| IngestionError::csv(path, e))?;

    let samples: Vec<Sample> = match channel.kind {
        SensorKind::Accelerometer => reader
            .deserialize::<AccelRow>()
            .map(|row| row.map(Sample::from))
            .collect::<std::result::Result<_, _>>(),
        SensorKind::Gyroscope => reader
            .deserialize::<GyroRow>()
            .map(|row| row.map(Sample::from))
            .collect::<std::result::Result<_, _>>(),
    }
    .map_err(|e| IngestionError::csv(path, e))?;

    if samples.is_empty() {
        return Err(IngestionError::EmptyStream {
            path: path.to_path_buf(),
        });
    }

    if let Some(row) = samples
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        return Err(IngestionError::NonMonotonic {
            path: path.to_path_buf(),
            row: row + 1,
        });
    }

    debug!(samples = samples.len(), "stream loaded");
    Ok(Stream::new(channel, samples))
}

/// Writes `stream` in the same layout [`read_stream`] accepts.
pub fn write_stream(path: &Path, stream: &Stream) -> Result<()> {
    let kind = stream.channel().kind;
    let mut writer = csv::Writer::from_path(path).map_err(|e| IngestionError::csv(path, e))?;

    let mut header = vec![TIMESTAMP_COLUMN.to_string()];
    header.extend(Axis::ALL.iter().map(|&axis| kind.column(axis)));
    writer
        .write_record(&header)
        .map_err(|e| IngestionError::csv(path, e))?;

    for sample in stream.samples() {
        writer
            .write_record([
                sample.timestamp.to_string(),
                sample.values.x.to_string(),
                sample.values.y.to_string(),
                sample.values.z.to_string(),
            ])
            .map_err(|e| IngestionError::csv(path, e))?;
    }

    writer.flush().map_err(|e| IngestionError::io(path, e))
}
