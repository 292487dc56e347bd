//! # Dispatcher
//!
//! 分段结果分发模块。
//!
//! 负责：
//! - 消费 `TrialOutput`
//! - Fan-out 到多个 sinks
//! - 单个 sink 失败不影响其余 sinks

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

#[cfg(test)]
mod test_support;

pub use contracts::{SegmentSink, TrialOutput};
pub use dispatcher::{create_dispatcher, create_sink, Dispatcher};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::SinkMetrics;
pub use sinks::{CsvSink, CsvSinkConfig, EventsSink, LogSink};
