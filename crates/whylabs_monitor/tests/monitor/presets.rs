use crate::common::{TestHelper, MONITOR_ID};
use whylabs_monitor::{MissingDataPreset, MonitorBuilder, MonitorError, MonitorManager};
use whylabs_types::{
    AlgorithmConfig, Baseline, DiffMode, Metric, SimpleColumnMetric, TargetMatrix,
};

#[test]
fn test_missing_data_preset() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);

    MissingDataPreset::new(25.0, Some(vec!["age".to_string(), "income".to_string()]))
        .unwrap()
        .build(&mut setup)
        .unwrap();

    let analyzer = setup.analyzer().unwrap();
    match &analyzer.config {
        AlgorithmConfig::Diff(config) => {
            assert_eq!(config.metric, Metric::Column(SimpleColumnMetric::CountNullRatio));
            assert_eq!(config.mode, DiffMode::Pct);
            assert_eq!(config.threshold, 25.0);
            assert_eq!(config.baseline, Baseline::trailing_window(14));
        }
        other => panic!("expected a diff config, got {other:?}"),
    }
    match &analyzer.target_matrix {
        TargetMatrix::Column(matrix) => assert_eq!(
            matrix.include,
            Some(vec!["age".to_string(), "income".to_string()])
        ),
        other => panic!("expected a column matrix, got {other:?}"),
    }

    let mut manager = MonitorManager::new(setup);
    assert!(manager.validate().unwrap());
}

#[test]
fn test_missing_data_preset_rejects_unknown_columns() {
    let helper = TestHelper::new();
    let mut setup = helper.setup(MONITOR_ID);

    let result = MissingDataPreset::new(10.0, Some(vec!["nope".to_string()]))
        .unwrap()
        .build(&mut setup);

    assert!(matches!(result, Err(MonitorError::Validation(_))));
    assert!(setup.analyzer().is_none());
}
