//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合成 trial 数据 ([`fixtures`])
//! - 配置往返测试
//! - 文件 -> 组装 -> 预处理 -> 分段 -> 输出 的 e2e 测试

pub mod fixtures;

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::PipelineBlueprint;

    #[test]
    fn test_default_blueprint_is_valid() {
        assert!(ConfigLoader::validate(&PipelineBlueprint::default()).is_ok());
    }

    #[test]
    fn test_toml_round_trip_keeps_overrides() {
        let mut blueprint = PipelineBlueprint::default();
        blueprint.detection.contact_sensitivity = 45.0;
        blueprint.conditioning.crop.window_samples = 1200;

        let text = ConfigLoader::to_toml(&blueprint).unwrap();
        let parsed = ConfigLoader::load_from_str(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed.detection, blueprint.detection);
        assert_eq!(parsed.conditioning.crop.window_samples, 1200);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;

    use conditioning::{align, Conditioner, ConditioningError};
    use contracts::{
        ConditioningConfig, CropConfig, DeviceMap, FilterConfig, OutputConfig, SinkConfig,
        SinkType, TrialEvents,
    };
    use dispatcher::create_dispatcher;
    use ingestion::{assemble_directory, load_trial};
    use observability::BatchMetricsAggregator;
    use segmentation::TrialSegmenter;

    use crate::fixtures::{self, KNEE_FLEXION, LEFT_CONTACT, RIGHT_CONTACT, TAKE_OFF};

    fn segmenter() -> TrialSegmenter {
        TrialSegmenter::new(fixtures::detector_config())
    }

    fn assert_fixture_events(events: &TrialEvents) {
        assert_eq!(events.take_off.index, TAKE_OFF);
        assert_eq!(events.left_contact.index, LEFT_CONTACT);
        assert_eq!(events.right_contact.index, RIGHT_CONTACT);
        assert_eq!(events.knee_flexion.index, KNEE_FLEXION);
    }

    fn conditioning(align: bool, crop: Option<usize>) -> ConditioningConfig {
        ConditioningConfig {
            align,
            filter: FilterConfig {
                enabled: false,
                ..Default::default()
            },
            crop: CropConfig {
                enabled: crop.is_some(),
                window_samples: crop.unwrap_or(1),
                ..Default::default()
            },
        }
    }

    /// Files -> assembler -> loader -> segmenter -> csv + events sinks
    #[test]
    fn test_e2e_directory_to_outputs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let devices = DeviceMap::default();

        for participant in ["P1J1", "P2J1"] {
            let written = fixtures::write_recordings(
                input.path(),
                &fixtures::jump_recording(participant),
                &devices,
            )
            .unwrap();
            assert_eq!(written.len(), 6);
        }

        let (trials, skipped) = assemble_directory(input.path(), devices).unwrap();
        assert_eq!(trials.len(), 2);
        assert!(skipped.is_empty());
        assert!(trials.iter().all(|t| t.is_complete()));

        let output_config = OutputConfig {
            directory: output.path().display().to_string(),
            ..Default::default()
        };
        let mut dispatcher = create_dispatcher(
            &[
                SinkConfig::new("segments", SinkType::Csv),
                SinkConfig::new("events", SinkType::Events),
            ],
            &output_config,
        )
        .unwrap();

        let mut batch = BatchMetricsAggregator::new();
        for files in &trials {
            let recording = load_trial(files).unwrap();
            let trial = segmenter().segment(&recording).unwrap();
            assert_fixture_events(&trial.events);
            dispatcher.dispatch(&trial).unwrap();
            batch.record_success(&trial, 1.0);
        }
        let metrics = dispatcher.finish().unwrap();
        assert!(metrics.iter().all(|(_, m)| m.write_count == 2));

        let summary = batch.summary();
        assert_eq!(summary.trials_ok, 2);
        // (50 - 16) * 625us
        assert!((summary.flight_time_ms.mean - 21.25).abs() < 1e-9);

        let table = fs::read_to_string(output.path().join("feature_list.csv")).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split(',').count(), 1 + 5 + 216);
        assert!(lines[1].starts_with("P1J1,"));
        assert!(lines[2].starts_with("P2J1,"));

        let s2_acc = fs::read_to_string(output.path().join("P2J1-S2-acc-combined.csv")).unwrap();
        // left 50..300, right 52..300, pelvis 50..300 -> 250 rows + header
        assert_eq!(s2_acc.lines().count(), 251);

        let events = fs::read_to_string(output.path().join("events.csv")).unwrap();
        assert!(events.lines().nth(1).unwrap().starts_with("P1J1,16,"));
    }

    /// Recordings in the sensor frames come back to the same events after
    /// alignment.
    #[test]
    fn test_alignment_restores_body_frame() {
        let body = fixtures::jump_recording("P1");
        // every body-frame transform is its own inverse
        let raw = body
            .clone()
            .try_map_streams(|stream| Ok::<_, ConditioningError>(align(&stream)))
            .unwrap();

        let conditioner = Conditioner::from_config(&conditioning(true, None)).unwrap();
        let aligned = conditioner.condition(raw).unwrap();

        let events = segmenter().detect(&aligned).unwrap();
        assert_fixture_events(&events);
        assert_eq!(events, segmenter().detect(&body).unwrap());
    }

    #[test]
    fn test_wide_crop_keeps_events() {
        let conditioner = Conditioner::from_config(&conditioning(false, Some(1000))).unwrap();
        let cropped = conditioner
            .condition(fixtures::jump_recording("P1"))
            .unwrap();

        let events = segmenter().detect(&cropped).unwrap();
        assert_fixture_events(&events);
    }

    #[test]
    fn test_crop_without_impact_fails() {
        let conditioner = Conditioner::from_config(&conditioning(false, Some(100))).unwrap();
        let err = conditioner
            .condition(fixtures::flat_recording("P1"))
            .unwrap_err();
        assert!(matches!(err, ConditioningError::NoImpactFound { .. }));
    }

    #[test]
    fn test_flat_trial_fails_segmentation() {
        let err = segmenter()
            .segment(&fixtures::flat_recording("P1"))
            .unwrap_err();
        assert_eq!(err.kind(), "event_not_found");
    }
}
