//! PipelineBlueprint - Config Loader 输出
//!
//! 描述完整的处理配置：设备映射、检测参数、预处理、输出路由。
//! Every field is defaulted, so an empty document is a valid blueprint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{DetectorConfig, Location, SensorKind};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的处理配置蓝图
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineBlueprint {
    /// 配置版本
    pub version: ConfigVersion,

    /// 设备序列号 -> 佩戴位置
    #[validate(nested)]
    pub devices: DeviceMap,

    /// 事件检测参数
    #[validate(nested)]
    pub detection: DetectorConfig,

    /// 预处理 (对齐 / 滤波 / 裁剪)
    #[validate(nested)]
    pub conditioning: ConditioningConfig,

    /// 输出位置
    pub output: OutputConfig,

    /// 输出路由配置
    #[validate(nested)]
    pub sinks: Vec<SinkConfig>,
}

/// Device serial worn at each location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DeviceMap {
    #[validate(length(min = 1))]
    pub left_ankle: String,
    #[validate(length(min = 1))]
    pub right_ankle: String,
    #[validate(length(min = 1))]
    pub pelvis: String,
}

impl Default for DeviceMap {
    fn default() -> Self {
        Self {
            left_ankle: "TS-04223".to_string(),
            right_ankle: "TS-04204".to_string(),
            pelvis: "TS-04205".to_string(),
        }
    }
}

impl DeviceMap {
    /// Location of the device with `serial`, if it is one of ours.
    pub fn locate(&self, serial: &str) -> Option<Location> {
        Location::ALL
            .into_iter()
            .find(|&location| self.serial(location) == serial)
    }

    pub fn serial(&self, location: Location) -> &str {
        match location {
            Location::LeftAnkle => &self.left_ankle,
            Location::RightAnkle => &self.right_ankle,
            Location::Pelvis => &self.pelvis,
        }
    }
}

/// 预处理配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ConditioningConfig {
    /// Rotate every stream into the body frame
    pub align: bool,

    #[validate(nested)]
    pub filter: FilterConfig,

    #[validate(nested)]
    pub crop: CropConfig,
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            align: true,
            filter: FilterConfig::default(),
            crop: CropConfig::default(),
        }
    }
}

/// Butterworth 低通滤波参数
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,

    /// Filter order, must be even
    #[validate(range(min = 2))]
    pub order: usize,

    #[validate(range(exclusive_min = 0.0))]
    pub cutoff_hz: f64,

    #[validate(range(exclusive_min = 0.0))]
    pub accelerometer_rate_hz: f64,

    #[validate(range(exclusive_min = 0.0))]
    pub gyroscope_rate_hz: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: 4,
            cutoff_hz: 100.0,
            accelerometer_rate_hz: 1600.0,
            gyroscope_rate_hz: 1125.0,
        }
    }
}

impl FilterConfig {
    pub fn sample_rate(&self, kind: SensorKind) -> f64 {
        match kind {
            SensorKind::Accelerometer => self.accelerometer_rate_hz,
            SensorKind::Gyroscope => self.gyroscope_rate_hz,
        }
    }
}

/// 跳跃窗口裁剪参数
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CropConfig {
    pub enabled: bool,

    /// Left ankle anteroposterior value that marks the impact (m/s²)
    pub impact_threshold: f64,

    /// Samples kept on each side of the impact window
    #[validate(range(min = 1))]
    pub window_samples: usize,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            impact_threshold: -50.0,
            window_samples: 2000,
        }
    }
}

/// 输出位置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving every output file
    pub directory: String,

    /// File name of the accumulated feature table
    pub feature_list: String,

    /// Also write the conditioned per-channel streams
    pub write_conditioned: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "segments".to_string(),
            feature_list: "feature_list.csv".to_string(),
            write_conditioned: false,
        }
    }
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Sink 名称
    #[validate(length(min = 1))]
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    pub fn new(name: impl Into<String>, sink_type: SinkType) -> Self {
        Self {
            name: name.into(),
            sink_type,
            params: HashMap::new(),
        }
    }
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 合并段 CSV + 特征表
    Csv,
    /// 事件表
    Events,
    /// 日志输出
    Log,
}

impl PipelineBlueprint {
    /// Sinks to build; the default pair when none is configured.
    pub fn effective_sinks(&self) -> Vec<SinkConfig> {
        if self.sinks.is_empty() {
            vec![
                SinkConfig::new("segments", SinkType::Csv),
                SinkConfig::new("log", SinkType::Log),
            ]
        } else {
            self.sinks.clone()
        }
    }
}
