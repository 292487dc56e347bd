//! 批处理指标收集模块
//!
//! 记录每个 trial 的处理结果，并在内存中聚合批次摘要。

use contracts::TrialOutput;
use metrics::{counter, gauge, histogram};
use std::collections::BTreeMap;

/// 从 TrialOutput 记录指标
///
/// 每个 trial 成功分段后调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_trial_output;
///
/// let output = segmenter.segment(&recording)?;
/// record_trial_output(&output);
/// dispatcher.dispatch(&output)?;
/// ```
pub fn record_trial_output(output: &TrialOutput) {
    counter!("less_seg_trials_processed_total").increment(1);

    let events = &output.events;
    for event in [
        events.take_off,
        events.left_contact,
        events.right_contact,
        events.knee_flexion,
    ] {
        counter!("less_seg_events_detected_total", "kind" => event.kind.as_str()).increment(1);
    }

    // 腾空时间 (us -> ms)
    let flight_us = events.first_contact().timestamp - events.take_off.timestamp;
    histogram!("less_seg_flight_time_ms").record(flight_us as f64 / 1000.0);

    for segment in &output.combined {
        histogram!(
            "less_seg_segment_rows",
            "segment" => segment.segment.label(),
            "kind" => segment.kind.tag()
        )
        .record(segment.len() as f64);
    }

    gauge!("less_seg_feature_count").set(output.features.values.len() as f64);
}

/// 记录失败的 trial，`kind` 为错误分类标签
pub fn record_trial_failed(kind: &str) {
    counter!("less_seg_trials_failed_total", "kind" => kind.to_string()).increment(1);
}

/// 记录被跳过的输入文件
pub fn record_file_skipped(reason: &str) {
    counter!("less_seg_files_skipped_total", "reason" => reason.to_string()).increment(1);
}

/// 记录单个 trial 的处理耗时
pub fn record_trial_duration_ms(duration_ms: f64) {
    histogram!("less_seg_trial_duration_ms").record(duration_ms);
}

/// 批次指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct BatchMetricsAggregator {
    /// 成功的 trial 数
    pub trials_ok: u64,

    /// 失败的 trial 数
    pub trials_failed: u64,

    /// 跳过的文件数
    pub files_skipped: u64,

    /// 按错误类型统计的失败次数
    pub failures_by_kind: BTreeMap<String, u64>,

    /// 腾空时间统计 (ms)
    pub flight_stats: RunningStats,

    /// 合并文件行数统计
    pub row_stats: RunningStats,

    /// 单 trial 耗时统计 (ms)
    pub duration_stats: RunningStats,
}

impl BatchMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录成功的 trial
    pub fn record_success(&mut self, output: &TrialOutput, duration_ms: f64) {
        self.trials_ok += 1;
        let events = &output.events;
        let flight_us = events.first_contact().timestamp - events.take_off.timestamp;
        self.flight_stats.push(flight_us as f64 / 1000.0);
        for segment in &output.combined {
            self.row_stats.push(segment.len() as f64);
        }
        self.duration_stats.push(duration_ms);
    }

    /// 记录失败的 trial
    pub fn record_failure(&mut self, kind: &str) {
        self.trials_failed += 1;
        *self.failures_by_kind.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub fn record_skipped(&mut self, count: u64) {
        self.files_skipped += count;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        let total = self.trials_ok + self.trials_failed;
        MetricsSummary {
            trials_ok: self.trials_ok,
            trials_failed: self.trials_failed,
            files_skipped: self.files_skipped,
            failure_rate: if total > 0 {
                self.trials_failed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            flight_time_ms: StatsSummary::from(&self.flight_stats),
            segment_rows: StatsSummary::from(&self.row_stats),
            trial_duration_ms: StatsSummary::from(&self.duration_stats),
            failures_by_kind: self.failures_by_kind.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub trials_ok: u64,
    pub trials_failed: u64,
    pub files_skipped: u64,
    pub failure_rate: f64,
    pub flight_time_ms: StatsSummary,
    pub segment_rows: StatsSummary,
    pub trial_duration_ms: StatsSummary,
    pub failures_by_kind: BTreeMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Batch Metrics Summary ===")?;
        writeln!(f, "Trials segmented: {}", self.trials_ok)?;
        writeln!(
            f,
            "Trials failed: {} ({:.2}%)",
            self.trials_failed, self.failure_rate
        )?;
        writeln!(f, "Files skipped: {}", self.files_skipped)?;
        writeln!(f, "Flight time (ms): {}", self.flight_time_ms)?;
        writeln!(f, "Segment rows: {}", self.segment_rows)?;
        writeln!(f, "Trial duration (ms): {}", self.trial_duration_ms)?;

        if !self.failures_by_kind.is_empty() {
            writeln!(f, "Failures by kind:")?;
            for (kind, count) in &self.failures_by_kind {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差 (n - 1)
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        CombinedSegment, Event, EventKind, FeatureRecord, ParticipantId, SegmentId, SensorKind,
        TrialEvents,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn output() -> TrialOutput {
        let participant = ParticipantId::from("P1");
        let segment = |segment, kind| CombinedSegment {
            segment,
            kind,
            source_lens: [0, 0, 0],
            rows: Vec::new(),
        };
        TrialOutput {
            participant: participant.clone(),
            events: TrialEvents {
                take_off: Event::new(EventKind::TakeOff, 10, 6_250),
                left_contact: Event::new(EventKind::LeftContact, 50, 31_250),
                right_contact: Event::new(EventKind::RightContact, 52, 32_500),
                knee_flexion: Event::new(EventKind::KneeFlexion, 300, 187_500),
            },
            channels: Vec::new(),
            combined: vec![
                segment(SegmentId::One, SensorKind::Accelerometer),
                segment(SegmentId::Two, SensorKind::Gyroscope),
            ],
            features: FeatureRecord::new(participant),
        }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(value);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator() {
        let mut aggregator = BatchMetricsAggregator::new();
        aggregator.record_success(&output(), 12.0);
        aggregator.record_failure("event_not_found");
        aggregator.record_failure("event_not_found");
        aggregator.record_failure("empty_crop");
        aggregator.record_skipped(2);

        let summary = aggregator.summary();
        assert_eq!(summary.trials_ok, 1);
        assert_eq!(summary.trials_failed, 3);
        assert_eq!(summary.files_skipped, 2);
        assert!((summary.failure_rate - 75.0).abs() < 1e-10);
        assert_eq!(summary.failures_by_kind.get("event_not_found"), Some(&2));
        assert_eq!(summary.segment_rows.count, 2);
        // 31250us - 6250us
        assert!((summary.flight_time_ms.mean - 25.0).abs() < 1e-10);

        aggregator.reset();
        assert_eq!(aggregator.summary().trials_ok, 0);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = BatchMetricsAggregator::new();
        aggregator.record_success(&output(), 4.0);
        aggregator.record_failure("stream_too_short");

        let text = aggregator.summary().to_string();
        assert!(text.contains("Trials segmented: 1"));
        assert!(text.contains("50.00%"));
        assert!(text.contains("stream_too_short: 1"));
    }

    #[test]
    fn test_recorded_metric_names() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_trial_output(&output());
            record_file_skipped("unknown_device");
        });

        let text = handle.render();
        assert!(text.contains("less_seg_trials_processed_total 1"));
        assert!(text.contains("less_seg_events_detected_total{kind=\"knee_flexion\"} 1"));
        assert!(text.contains("less_seg_files_skipped_total{reason=\"unknown_device\"} 1"));
        assert!(text.contains("less_seg_segment_rows"));
    }
}
