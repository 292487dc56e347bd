//! Synthetic jump trials shared by the integration tests.
//!
//! Signals are defined in the body frame (y anteroposterior, z vertical)
//! on a 400 sample accelerometer grid (625 us) and a 400 sample gyroscope
//! grid (889 us). With [`detector_config`] the detectors find take-off at
//! 16, left contact at 50, right contact at 52 and knee flexion at 300.

use std::path::{Path, PathBuf};

use contracts::{
    Channel, DetectorConfig, DeviceMap, Location, Sample, SensorKind, Stream, TrialRecording,
};

pub const SAMPLES: usize = 400;
pub const ACC_STEP_US: i64 = 625;
pub const GYRO_STEP_US: i64 = 889;
/// Recording start, Unix microseconds
pub const START_US: i64 = 1_683_000_000_000_000;

pub const TAKE_OFF: usize = 16;
pub const LEFT_CONTACT: usize = 50;
pub const RIGHT_CONTACT: usize = 52;
pub const KNEE_FLEXION: usize = 300;

/// Detector margins scaled down to the short synthetic recordings.
pub fn detector_config() -> DetectorConfig {
    DetectorConfig {
        take_off_search_offset: 20,
        flexion_landing_margin: 100,
        flexion_tail_margin: 50,
        flexion_stall_samples: 10,
        ..Default::default()
    }
}

/// Deceleration dip before take-off, squat trough at 300, recovery after.
fn pelvis_ap(i: usize) -> f64 {
    match i {
        15 => -5.0,
        16..=24 => -30.0 + 4.0 * i.abs_diff(20) as f64,
        _ if i < KNEE_FLEXION => -20.0 + 0.05 * (KNEE_FLEXION - i) as f64,
        _ => -20.0 + 0.5 * (i - KNEE_FLEXION) as f64,
    }
}

fn pelvis_vertical(i: usize) -> f64 {
    40.0 - 0.5 * i.abs_diff(320) as f64
}

/// Ankle vertical with a landing spike right after `contact`, plus an
/// anteroposterior impact that the crop window keys on.
fn ankle(contact: usize, i: usize) -> (f64, f64, f64) {
    let vertical = if i == contact {
        30.0
    } else if i == contact + 1 {
        90.0
    } else {
        9.8
    };
    let ap = if i == contact + 1 { -60.0 } else { 0.0 };
    (0.0, ap, vertical)
}

fn stream(channel: Channel, f: impl Fn(usize) -> (f64, f64, f64)) -> Stream {
    let step = match channel.kind {
        SensorKind::Accelerometer => ACC_STEP_US,
        SensorKind::Gyroscope => GYRO_STEP_US,
    };
    Stream::new(
        channel,
        (0..SAMPLES)
            .map(|i| {
                let (x, y, z) = f(i);
                Sample::new(START_US + i as i64 * step, x, y, z)
            })
            .collect(),
    )
}

fn gyroscopes(recording: &mut TrialRecording) {
    for location in Location::ALL {
        recording.insert(stream(
            Channel::new(location, SensorKind::Gyroscope),
            |i| (i as f64 * 0.1, 1.0, -2.0),
        ));
    }
}

/// A complete, body-frame trial that segments cleanly.
pub fn jump_recording(participant: &str) -> TrialRecording {
    use Location::*;
    use SensorKind::Accelerometer;

    let mut recording = TrialRecording::new(participant.into());
    recording.insert(stream(Channel::new(LeftAnkle, Accelerometer), |i| {
        ankle(LEFT_CONTACT, i)
    }));
    recording.insert(stream(Channel::new(RightAnkle, Accelerometer), |i| {
        ankle(RIGHT_CONTACT, i)
    }));
    recording.insert(stream(Channel::new(Pelvis, Accelerometer), |i| {
        (0.0, pelvis_ap(i), pelvis_vertical(i))
    }));
    gyroscopes(&mut recording);
    recording
}

/// Same as [`jump_recording`] but the ankles never register a landing.
pub fn flat_recording(participant: &str) -> TrialRecording {
    let mut recording = jump_recording(participant);
    for location in [Location::LeftAnkle, Location::RightAnkle] {
        recording.insert(stream(
            Channel::new(location, SensorKind::Accelerometer),
            |_| (0.0, 0.0, 9.8),
        ));
    }
    recording
}

/// Recording file name for `channel` as the devices write it.
pub fn file_name(participant: &str, devices: &DeviceMap, channel: Channel) -> String {
    format!(
        "{}_{}_jump_{}",
        participant,
        devices.serial(channel.location),
        channel.kind.file_suffix()
    )
}

/// Writes every stream of `recording` into `dir`.
pub fn write_recordings(
    dir: &Path,
    recording: &TrialRecording,
    devices: &DeviceMap,
) -> ingestion::Result<Vec<PathBuf>> {
    let participant = recording.participant().file_stem();
    let mut paths = Vec::new();
    for channel in recording.channels() {
        if let Some(stream) = recording.get(channel) {
            let path = dir.join(file_name(&participant, devices, channel));
            ingestion::write_stream(&path, stream)?;
            paths.push(path);
        }
    }
    Ok(paths)
}
