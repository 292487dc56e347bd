//! Sample / Stream - ingestion 输出
//!
//! 单个传感器通道的原始时序数据。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 3D 向量 (加速度 m/s² 或角速度 deg/s)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Padding value written for rows past the end of a shorter stream.
    pub const SENTINEL: Vector3 = Vector3 {
        x: -1.0,
        y: -1.0,
        z: -1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component along `axis`.
    #[inline]
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// True when every component equals the sentinel value.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

/// Sensor axis after alignment to the body frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Forward/backward body axis.
    pub const ANTEROPOSTERIOR: Axis = Axis::Y;

    /// Up/down body axis.
    pub const VERTICAL: Axis = Axis::Z;

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// 传感器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// 加速度计 (high-g, m/s²)
    Accelerometer,
    /// 陀螺仪 (low-g, deg/s)
    Gyroscope,
}

impl SensorKind {
    pub const ALL: [SensorKind; 2] = [SensorKind::Accelerometer, SensorKind::Gyroscope];

    /// Recording file name suffix for this kind.
    pub fn file_suffix(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "highg.csv",
            SensorKind::Gyroscope => "lowg.csv",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| name.ends_with(kind.file_suffix()))
    }

    /// Column letter used in CSV headers (`ax`, `gx`, ...).
    pub fn letter(self) -> char {
        match self {
            SensorKind::Accelerometer => 'a',
            SensorKind::Gyroscope => 'g',
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "m/s/s",
            SensorKind::Gyroscope => "deg/s",
        }
    }

    /// Short tag used in output file names.
    pub fn tag(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "acc",
            SensorKind::Gyroscope => "gyro",
        }
    }

    /// Per-axis column name in a single-sensor recording, e.g. `ay_m/s/s`.
    pub fn column(self, axis: Axis) -> String {
        format!("{}{}_{}", self.letter(), axis.letter(), self.unit())
    }
}

/// 传感器佩戴位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    LeftAnkle,
    RightAnkle,
    Pelvis,
}

impl Location {
    /// Output column order: left, right, pelvis.
    pub const ALL: [Location; 3] = [Location::LeftAnkle, Location::RightAnkle, Location::Pelvis];

    pub fn letter(self) -> char {
        match self {
            Location::LeftAnkle => 'l',
            Location::RightAnkle => 'r',
            Location::Pelvis => 'p',
        }
    }

    /// Label used in feature names.
    pub fn label(self) -> &'static str {
        match self {
            Location::LeftAnkle => "LANK",
            Location::RightAnkle => "RANK",
            Location::Pelvis => "PELV",
        }
    }
}

/// One physical sensor channel of a trial (location x kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub location: Location,
    pub kind: SensorKind,
}

impl Channel {
    pub const fn new(location: Location, kind: SensorKind) -> Self {
        Self { location, kind }
    }

    /// All six channels of a trial, accelerometer before gyroscope per location.
    pub fn all() -> [Channel; 6] {
        use Location::*;
        use SensorKind::*;
        [
            Channel::new(LeftAnkle, Accelerometer),
            Channel::new(LeftAnkle, Gyroscope),
            Channel::new(RightAnkle, Accelerometer),
            Channel::new(RightAnkle, Gyroscope),
            Channel::new(Pelvis, Accelerometer),
            Channel::new(Pelvis, Gyroscope),
        ]
    }

    /// Column name in a combined segment file, e.g. `lax_m/s/s`.
    pub fn combined_column(self, axis: Axis) -> String {
        format!(
            "{}{}{}_{}",
            self.location.letter(),
            self.kind.letter(),
            axis.letter(),
            self.kind.unit()
        )
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.location, self.kind)
    }
}

/// 单个时间戳采样
///
/// Immutable once read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix 时间戳 (微秒)
    pub timestamp: i64,

    /// 三轴数值
    pub values: Vector3,
}

impl Sample {
    pub const fn new(timestamp: i64, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp,
            values: Vector3::new(x, y, z),
        }
    }
}

/// Ordered samples of one channel for one trial.
///
/// Timestamps increase monotonically but the sampling interval is not
/// assumed to be constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    channel: Channel,
    samples: Vec<Sample>,
}

impl Stream {
    pub fn new(channel: Channel, samples: Vec<Sample>) -> Self {
        Self { channel, samples }
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp at `index`, if in range.
    #[inline]
    pub fn timestamp(&self, index: usize) -> Option<i64> {
        self.samples.get(index).map(|s| s.timestamp)
    }

    /// Axis value at `index`, if in range.
    #[inline]
    pub fn value(&self, index: usize, axis: Axis) -> Option<f64> {
        self.samples.get(index).map(|s| s.values.get(axis))
    }

    /// Index of the sample closest in time to `timestamp`.
    ///
    /// Linear scan since gaps between samples are irregular; the first
    /// sample wins on ties. `None` only for an empty stream.
    pub fn closest_index(&self, timestamp: i64) -> Option<usize> {
        // min_by_key keeps the first of equal elements
        self.samples
            .iter()
            .enumerate()
            .min_by_key(|(_, sample)| sample.timestamp.abs_diff(timestamp))
            .map(|(index, _)| index)
    }

    /// Copy of `[start, end)`; callers guarantee `start <= end <= len`.
    pub fn slice(&self, start: usize, end: usize) -> Vec<Sample> {
        self.samples[start..end].to_vec()
    }

    /// Builds a new stream over the same channel with transformed samples.
    pub fn map_samples<F>(&self, f: F) -> Stream
    where
        F: FnMut(&Sample) -> Sample,
    {
        Stream {
            channel: self.channel,
            samples: self.samples.iter().map(f).collect(),
        }
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}
