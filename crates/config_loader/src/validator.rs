//! 配置校验模块
//!
//! 校验规则：
//! - 字段级规则 (derive `Validate`)：序列号非空、阶数/窗口/采样率范围
//! - 设备序列号互不相同
//! - contact_sensitivity > contact_onset_threshold
//! - 滤波阶数为偶数，截止频率低于每个采样率的 Nyquist 频率
//! - sink 名称非空且唯一

use std::collections::HashSet;

use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};
use contracts::{ContractError, Location, PipelineBlueprint, SensorKind};

/// 校验 PipelineBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_devices(blueprint)?;
    validate_detection(blueprint)?;
    validate_filter(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

/// 字段级规则
fn validate_fields(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    blueprint.validate().map_err(|errors| {
        let (field, message) = first_error(&errors, String::new())
            .unwrap_or_else(|| ("blueprint".to_string(), errors.to_string()));
        ContractError::config_validation(field, message)
    })
}

/// Depth-first walk to the first failing leaf, keys sorted for stable output.
fn first_error(errors: &ValidationErrors, prefix: String) -> Option<(String, String)> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (key, kind) in entries {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(error) = list.first() {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("failed '{}' rule", error.code),
                    };
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_error(inner, path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_error(inner, format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

/// 校验设备序列号唯一性
fn validate_devices(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for location in Location::ALL {
        let serial = blueprint.devices.serial(location);
        if !seen.insert(serial) {
            return Err(ContractError::config_validation(
                format!("devices[serial={serial}]"),
                "duplicate device serial",
            ));
        }
    }
    Ok(())
}

/// 校验检测阈值
fn validate_detection(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let detection = &blueprint.detection;
    if detection.contact_sensitivity <= detection.contact_onset_threshold {
        return Err(ContractError::config_validation(
            "detection.contact_sensitivity / detection.contact_onset_threshold",
            format!(
                "contact_sensitivity ({}) must be > contact_onset_threshold ({})",
                detection.contact_sensitivity, detection.contact_onset_threshold
            ),
        ));
    }
    Ok(())
}

/// 校验滤波器设计参数
fn validate_filter(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let filter = &blueprint.conditioning.filter;
    if !filter.enabled {
        return Ok(());
    }

    if filter.order == 0 || filter.order % 2 != 0 {
        return Err(ContractError::config_validation(
            "conditioning.filter.order",
            format!("order must be even and > 0, got {}", filter.order),
        ));
    }

    for kind in SensorKind::ALL {
        let nyquist = filter.sample_rate(kind) / 2.0;
        if filter.cutoff_hz >= nyquist {
            return Err(ContractError::config_validation(
                "conditioning.filter.cutoff_hz",
                format!(
                    "cutoff_hz ({}) must be below the {} Nyquist frequency ({nyquist})",
                    filter.cutoff_hz,
                    kind.tag()
                ),
            ));
        }
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                format!("duplicate sink name '{}'", sink.name),
            ));
        }
    }
    Ok(())
}
