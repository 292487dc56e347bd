//! Sink implementations
//!
//! Contains CsvSink, EventsSink, and LogSink.

mod combined;
mod events;
mod log;

pub use self::combined::{CsvSink, CsvSinkConfig};
pub use self::events::EventsSink;
pub use self::log::LogSink;
