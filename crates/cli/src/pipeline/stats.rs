//! Pipeline statistics.

use std::time::Duration;

use contracts::TrialOutput;
use dispatcher::SinkMetrics;
use observability::BatchMetricsAggregator;

/// Statistics from a batch run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Recordings found in the input directory
    pub files_listed: usize,

    /// Total duration of the run
    pub duration: Duration,

    /// True when Ctrl-C stopped the batch early
    pub interrupted: bool,

    /// Per-sink write counters
    pub sink_metrics: Vec<(String, SinkMetrics)>,

    /// Trial outcome aggregator
    pub batch: BatchMetricsAggregator,
}

impl PipelineStats {
    pub fn record_success(&mut self, output: &TrialOutput, elapsed: Duration) {
        self.batch
            .record_success(output, elapsed.as_secs_f64() * 1000.0);
    }

    pub fn record_failure(&mut self, kind: &str) {
        self.batch.record_failure(kind);
    }

    pub fn record_skipped(&mut self, count: usize) {
        self.batch.record_skipped(count as u64);
    }

    pub fn trials_ok(&self) -> u64 {
        self.batch.trials_ok
    }

    pub fn trials_failed(&self) -> u64 {
        self.batch.trials_failed
    }

    /// Trials processed per second
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.trials_ok() + self.trials_failed()) as f64 / secs
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Segmentation Summary                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        let summary = self.batch.summary();

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Files listed: {}", self.files_listed);
        println!("   ├─ Files skipped: {}", summary.files_skipped);
        println!("   ├─ Trials segmented: {}", summary.trials_ok);
        println!(
            "   ├─ Trials failed: {} ({:.2}%)",
            summary.trials_failed, summary.failure_rate
        );
        println!("   └─ Trials/s: {:.2}", self.throughput());

        println!("\n📈 Trial Metrics");
        println!("   ├─ Flight time (ms): {}", summary.flight_time_ms);
        println!("   ├─ Segment rows: {}", summary.segment_rows);
        println!("   └─ Trial duration (ms): {}", summary.trial_duration_ms);

        if !summary.failures_by_kind.is_empty() {
            println!("\n⚠️  Failures by Kind");
            for (kind, count) in &summary.failures_by_kind {
                println!("   ├─ {}: {}", kind, count);
            }
        }

        if !self.sink_metrics.is_empty() {
            println!("\n📦 Sinks");
            for (name, metrics) in &self.sink_metrics {
                println!(
                    "   ├─ {}: {} written, {} failed",
                    name, metrics.write_count, metrics.failure_count
                );
            }
        }

        if self.interrupted {
            println!("\n⏹  Stopped early by Ctrl-C");
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_throughput() {
        let mut stats = PipelineStats {
            duration: Duration::from_secs(2),
            ..Default::default()
        };
        stats.record_failure("event_not_found");
        stats.record_failure("empty_crop");
        stats.record_skipped(3);

        assert_eq!(stats.trials_ok(), 0);
        assert_eq!(stats.trials_failed(), 2);
        assert_eq!(stats.batch.files_skipped, 3);
        assert!((stats.throughput() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_duration_throughput() {
        assert_eq!(PipelineStats::default().throughput(), 0.0);
    }
}
