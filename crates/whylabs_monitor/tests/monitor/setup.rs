use crate::common::{median_diff, stored_stddev_pair, TestHelper, MONITOR_ID};
use chrono::{NaiveDate, TimeZone, Utc};
use whylabs_mocks::MockWhyLabsApi;
use whylabs_monitor::{MonitorError, SetupStatus};
use whylabs_types::{
    AlgorithmConfig, Baseline, Cadence, ColumnMatrix, DatasetMatrix, DatasetMetric,
    FixedThresholdsConfig, Metric, MonitorAction, MonitorMode, Schedule, Segment, SeasonalConfig,
    TargetMatrix, TimePeriod, CONSTRAINT_TAG,
};

fn segment() -> Segment {
    Segment::new(vec![("purpose".to_string(), "car".to_string())])
}

fn column_include(matrix: &TargetMatrix) -> Option<Vec<String>> {
    match matrix {
        TargetMatrix::Column(matrix) => matrix.include.clone(),
        TargetMatrix::Dataset(_) => None,
    }
}

#[test]
fn test_blank_setup() {
    let helper = TestHelper::new();
    let setup = helper.setup(MONITOR_ID);

    assert_eq!(setup.status(), SetupStatus::Uninitialized);
    assert!(setup.existing_monitor().is_none());
    assert!(setup.existing_analyzer().is_none());
    assert!(setup.config().is_none());
    assert_eq!(
        setup.credentials().analyzer_id,
        "some_long_and_descriptive_id-analyzer"
    );
}

#[test]
fn test_valid_target_columns_land_in_include() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(median_diff());

    let columns = vec!["age".to_string(), "group:continuous".to_string()];
    setup.set_target_columns(columns.clone()).unwrap();
    setup.apply().unwrap();

    let analyzer = setup.analyzer().unwrap();
    assert_eq!(column_include(&analyzer.target_matrix), Some(columns));
}

#[test]
fn test_unknown_column_is_rejected() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    let matrix: TargetMatrix =
        ColumnMatrix::new(vec!["age".to_string()], vec![], vec![]).into();
    setup.set_target_matrix(matrix.clone());

    let result = setup.set_target_columns(vec!["age".to_string(), "not_a_column".to_string()]);

    match result {
        Err(MonitorError::Validation(message)) => {
            assert!(message.contains("not_a_column"));
            assert!(message.contains("income"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(setup.target_matrix(), Some(&matrix));
    assert!(setup.target_columns().is_none());
}

#[test]
fn test_group_tokens_skip_schema_lookup() {
    let helper = TestHelper::with_api(MockWhyLabsApi::empty().with_model(TimePeriod::Daily));
    let mut setup = helper.setup(MONITOR_ID);
    helper.api.clear_calls();

    setup
        .set_target_columns(vec!["group:input".to_string(), "group:discrete".to_string()])
        .unwrap();

    assert!(helper.api.calls().is_empty());
}

#[test]
fn test_target_columns_update_existing_column_matrix() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_target_matrix(
        ColumnMatrix::new(vec!["*".to_string()], vec![], vec![segment()]).into(),
    );

    setup.set_target_columns(vec!["income".to_string()]).unwrap();
    setup.exclude_target_columns(vec!["prediction".to_string()]).unwrap();

    match setup.target_matrix() {
        Some(TargetMatrix::Column(matrix)) => {
            assert_eq!(matrix.include, Some(vec!["income".to_string()]));
            assert_eq!(matrix.exclude, Some(vec!["prediction".to_string()]));
            assert_eq!(matrix.segments, Some(vec![segment()]));
        }
        other => panic!("expected a column matrix, got {other:?}"),
    }
}

#[test]
fn test_include_and_exclude_do_not_clobber() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(median_diff());

    setup.exclude_target_columns(vec!["prediction".to_string()]).unwrap();
    setup
        .set_target_columns(vec!["group:continuous".to_string()])
        .unwrap();
    setup.apply().unwrap();

    match &setup.analyzer().unwrap().target_matrix {
        TargetMatrix::Column(matrix) => {
            assert_eq!(matrix.include, Some(vec!["group:continuous".to_string()]));
            assert_eq!(matrix.exclude, Some(vec!["prediction".to_string()]));
        }
        other => panic!("expected a column matrix, got {other:?}"),
    }
}

#[test]
fn test_apply_requires_config() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);

    assert!(matches!(setup.apply(), Err(MonitorError::Validation(_))));
    assert!(setup.monitor().is_none());
}

#[test]
fn test_apply_defaults() {
    let helper = TestHelper::with_api(
        MockWhyLabsApi::new().with_model(TimePeriod::Hourly),
    );
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(median_diff());
    setup.apply().unwrap();

    assert_eq!(setup.schedule(), Some(&Schedule::fixed(Cadence::Hourly)));
    assert_eq!(setup.mode(), Some(&MonitorMode::default()));
    assert_eq!(setup.actions(), Some(&vec![]));

    let monitor = setup.monitor().unwrap();
    assert_eq!(monitor.display_name.as_deref(), Some(MONITOR_ID));
    assert_eq!(
        monitor.analyzer_ids,
        vec!["some_long_and_descriptive_id-analyzer".to_string()]
    );
    assert_eq!(monitor.schedule, Schedule::Immediate);
    assert_eq!(monitor.severity, Some(3));
    assert_eq!(monitor.disabled, Some(false));

    let analyzer = setup.analyzer().unwrap();
    assert_eq!(analyzer.schedule, Some(Schedule::fixed(Cadence::Hourly)));
    assert_eq!(column_include(&analyzer.target_matrix), Some(vec!["*".to_string()]));
}

#[test]
fn test_apply_is_idempotent() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(FixedThresholdsConfig::new(
        DatasetMetric::ProfileCount,
        Some(10.0),
        None,
    ));

    setup.apply().unwrap();
    let (monitor, analyzer) = (setup.monitor().cloned(), setup.analyzer().cloned());
    setup.apply().unwrap();

    assert_eq!(setup.monitor().cloned(), monitor);
    assert_eq!(setup.analyzer().cloned(), analyzer);
}

#[test]
fn test_dataset_metric_switches_to_dataset_matrix() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_target_matrix(
        ColumnMatrix::new(vec!["age".to_string()], vec![], vec![segment()]).into(),
    );
    setup.set_config(FixedThresholdsConfig::new(
        DatasetMetric::ProfileCount,
        Some(10.0),
        None,
    ));
    setup.apply().unwrap();

    assert_eq!(
        setup.analyzer().unwrap().target_matrix,
        TargetMatrix::Dataset(DatasetMatrix {
            segments: Some(vec![segment()])
        })
    );
}

#[test]
fn test_column_metric_switches_to_column_matrix() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_target_matrix(
        DatasetMatrix {
            segments: Some(vec![segment()]),
        }
        .into(),
    );
    setup.set_config(median_diff());
    setup.apply().unwrap();

    assert_eq!(
        setup.analyzer().unwrap().target_matrix,
        TargetMatrix::Column(ColumnMatrix::new(
            vec!["*".to_string()],
            vec![],
            vec![segment()]
        ))
    );
}

#[test]
fn test_ingestion_metric_forces_dataset_matrix() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup
        .set_target_columns(vec!["group:continuous".to_string()])
        .unwrap();
    setup.set_config(FixedThresholdsConfig::new(
        Metric::seconds_since_last_upload(),
        None,
        Some(86400.0),
    ));
    setup.apply().unwrap();

    assert!(setup.analyzer().unwrap().target_matrix.is_dataset());
}

#[test]
fn test_constraint_tag_guard() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);

    assert!(setup.set_is_constraint(true).is_err());

    setup.set_config(median_diff());
    assert!(setup.set_is_constraint(true).is_err());
    assert!(!setup.is_constraint());

    setup.set_config(FixedThresholdsConfig::new(
        DatasetMetric::ProfileCount,
        Some(1.0),
        None,
    ));
    setup.set_analyzer_tags(vec!["team-risk".to_string()]);
    setup.set_is_constraint(true).unwrap();
    setup.set_is_constraint(true).unwrap();
    assert_eq!(
        setup.analyzer_tags(),
        Some(&vec!["team-risk".to_string(), CONSTRAINT_TAG.to_string()])
    );

    setup.apply().unwrap();
    assert!(setup
        .analyzer()
        .unwrap()
        .tags
        .as_ref()
        .unwrap()
        .contains(&CONSTRAINT_TAG.to_string()));

    setup.set_is_constraint(false).unwrap();
    assert_eq!(setup.analyzer_tags(), Some(&vec!["team-risk".to_string()]));
    assert!(!setup.is_constraint());
}

#[test]
fn test_non_constraint_config_drops_constraint_tag() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);

    setup.set_config(FixedThresholdsConfig::new(
        DatasetMetric::ProfileCount,
        Some(1.0),
        None,
    ));
    setup.set_analyzer_tags(vec!["team-risk".to_string()]);
    setup.set_is_constraint(true).unwrap();
    assert!(setup.is_constraint());

    // another constraint-capable config keeps the tag
    setup.set_config(FixedThresholdsConfig::new(
        DatasetMetric::ProfileCount,
        Some(2.0),
        None,
    ));
    assert!(setup.is_constraint());

    setup.set_config(median_diff());
    assert!(!setup.is_constraint());
    assert_eq!(setup.analyzer_tags(), Some(&vec!["team-risk".to_string()]));

    setup.apply().unwrap();
    assert_eq!(
        setup.analyzer().unwrap().tags,
        Some(vec!["team-risk".to_string()])
    );
}

#[test]
fn test_data_readiness_duration() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);

    for valid in ["P1DT18H", "PT6H", "P1D", "P1Y2M3DT4H5M6S"] {
        setup.set_data_readiness_duration(valid).unwrap();
        assert_eq!(setup.data_readiness_duration(), Some(valid));
    }

    for invalid in ["P", "PT", "P1DT", "1D", "P1H", "one day"] {
        assert!(
            matches!(
                setup.set_data_readiness_duration(invalid),
                Err(MonitorError::Validation(_))
            ),
            "{invalid} should be rejected"
        );
    }
    assert_eq!(setup.data_readiness_duration(), Some("P1Y2M3DT4H5M6S"));
}

#[test]
fn test_fixed_dates_baseline() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();

    match setup.set_fixed_dates_baseline(start, end) {
        Err(MonitorError::Validation(message)) => {
            assert!(message.contains("config must first be set"))
        }
        other => panic!("expected a validation error, got {other:?}"),
    }

    setup.set_config(median_diff());
    setup.set_fixed_dates_baseline(start, end).unwrap();

    match setup.config().unwrap().baseline() {
        Some(Baseline::TimeRange(baseline)) => {
            assert_eq!(
                baseline.range.start,
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
            );
            assert_eq!(
                baseline.range.end,
                Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap()
            );
        }
        other => panic!("expected a time range baseline, got {other:?}"),
    }

    // aware datetimes are converted to utc
    let offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
    let aware_start = offset.with_ymd_and_hms(2023, 2, 1, 2, 0, 0).unwrap();
    let aware_end = offset.with_ymd_and_hms(2023, 2, 2, 2, 0, 0).unwrap();
    setup
        .set_fixed_dates_baseline(aware_start, aware_end)
        .unwrap();
    match setup.config().unwrap().baseline() {
        Some(Baseline::TimeRange(baseline)) => assert_eq!(
            baseline.range.start,
            Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap()
        ),
        other => panic!("expected a time range baseline, got {other:?}"),
    }

    assert!(setup.set_fixed_dates_baseline(end, start).is_err());
}

#[test]
fn test_fixed_dates_baseline_unsupported_configs() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap();

    setup.set_config(FixedThresholdsConfig::new(
        DatasetMetric::ProfileCount,
        Some(1.0),
        None,
    ));
    assert!(setup.set_fixed_dates_baseline(start, end).is_err());

    let seasonal: SeasonalConfig = serde_json::from_value(serde_json::json!({
        "metric": "mean",
        "baseline": {"type": "TrailingWindow", "size": 30}
    }))
    .unwrap();
    setup.set_config(AlgorithmConfig::Seasonal(seasonal));
    assert!(setup.set_fixed_dates_baseline(start, end).is_err());
    assert!(matches!(
        setup.config().unwrap().baseline(),
        Some(Baseline::TrailingWindow(_))
    ));
}

#[test]
fn test_prefill_from_stored_analyzer() {
    let (monitor, analyzer) = stored_stddev_pair(MONITOR_ID);
    let helper = TestHelper::with_api(
        MockWhyLabsApi::new()
            .with_monitor(monitor.clone())
            .with_analyzer(analyzer.clone()),
    );

    let mut setup = helper.setup(MONITOR_ID);

    assert_eq!(setup.existing_analyzer(), Some(&analyzer));
    assert_eq!(setup.config(), Some(&analyzer.config));
    assert!(matches!(setup.config(), Some(AlgorithmConfig::Stddev(_))));
    assert_eq!(setup.target_matrix(), Some(&analyzer.target_matrix));
    assert_eq!(setup.schedule(), analyzer.schedule.as_ref());
    assert_eq!(setup.analyzer_tags(), Some(&vec!["stored".to_string()]));
    assert_eq!(setup.monitor_tags(), Some(&vec!["team-risk".to_string()]));
    assert_eq!(setup.data_readiness_duration(), Some("PT6H"));
    assert_eq!(setup.mode(), Some(&monitor.mode));

    setup.apply().unwrap();
    assert_eq!(setup.analyzer().unwrap().config, analyzer.config);
    assert_eq!(
        column_include(&setup.analyzer().unwrap().target_matrix),
        Some(vec!["age".to_string()])
    );
}

#[test]
fn test_status_transitions() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    assert_eq!(setup.status(), SetupStatus::Uninitialized);

    setup.set_config(median_diff());
    assert_eq!(setup.status(), SetupStatus::Mutated);

    setup.apply().unwrap();
    assert_eq!(setup.status(), SetupStatus::Applied);

    setup.set_actions(vec![MonitorAction::global("slack-alerts")]);
    assert_eq!(setup.status(), SetupStatus::Mutated);
}

#[test]
fn test_describe_includes_credentials() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(median_diff());
    setup.apply().unwrap();

    let description = setup.describe();
    assert!(description.contains(MONITOR_ID));
}
