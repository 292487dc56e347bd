//! Ingestion 错误类型

use std::path::PathBuf;

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 文件读取失败
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV 解析失败
    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// 文件名不符合 `<participant>_<serial>_..._<highg|lowg>.csv`
    #[error("unrecognised recording name '{name}': {reason}")]
    UnrecognisedName { name: String, reason: String },

    /// 时间戳倒退
    #[error("timestamps go backwards in {path} at row {row}")]
    NonMonotonic { path: PathBuf, row: usize },

    /// 文件无数据行
    #[error("no samples in {path}")]
    EmptyStream { path: PathBuf },
}

impl IngestionError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionError::Io { .. } => "io",
            IngestionError::Csv { .. } => "malformed_csv",
            IngestionError::UnrecognisedName { .. } => "unrecognised_name",
            IngestionError::NonMonotonic { .. } => "non_monotonic",
            IngestionError::EmptyStream { .. } => "empty_recording",
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
