//! Conditioning 错误类型

use contracts::Channel;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConditioningError {
    /// Filter parameters cannot produce a stable low-pass design
    #[error("invalid filter design: {0}")]
    InvalidFilter(String),

    /// The crop reference channel never crosses the impact threshold
    #[error("no impact below {threshold} found on {channel}")]
    NoImpactFound { channel: Channel, threshold: f64 },

    /// The crop reference channel was not loaded
    #[error("crop reference stream {0} is missing")]
    MissingReference(Channel),

    /// The crop window leaves no samples in a stream
    #[error("crop window leaves {channel} empty")]
    EmptyCrop { channel: Channel },
}

impl ConditioningError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConditioningError::InvalidFilter(_) => "invalid_filter",
            ConditioningError::NoImpactFound { .. } => "no_impact_found",
            ConditioningError::MissingReference(_) => "missing_reference",
            ConditioningError::EmptyCrop { .. } => "empty_crop",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConditioningError>;
