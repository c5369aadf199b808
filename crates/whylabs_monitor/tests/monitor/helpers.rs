use crate::common::{stored_stddev_pair, TestHelper, MONITOR_ID};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use whylabs_mocks::MockWhyLabsApi;
use whylabs_monitor::helpers::{
    UpdateColumnClassifiers, UpdateColumnsDiscreteness, UpdateEntity, UpdateEntityDataTypes,
};
use whylabs_monitor::MonitorError;
use whylabs_types::{
    ColumnClassifier, ColumnDataType, ColumnDiscreteness, Granularity, TimePeriod,
};

fn helper_with_stored_monitor() -> TestHelper {
    let (monitor, analyzer) = stored_stddev_pair(MONITOR_ID);
    TestHelper::with_api(
        MockWhyLabsApi::new()
            .with_monitor(monitor)
            .with_analyzer(analyzer),
    )
}

#[test]
fn test_missing_resources_read_as_none() {
    let helper = TestHelper::with_api(MockWhyLabsApi::empty());
    let client = helper.client();

    assert!(client.get_monitor(MONITOR_ID).unwrap().is_none());
    assert!(client.get_analyzer_ids(MONITOR_ID).unwrap().is_none());
    assert!(client.get_analyzers(MONITOR_ID).unwrap().is_none());
    assert!(client.get_model_granularity().unwrap().is_none());
}

#[test]
fn test_monitor_lookups() {
    let helper = helper_with_stored_monitor();
    let client = helper.client();

    let monitor = client.get_monitor(MONITOR_ID).unwrap().unwrap();
    assert_eq!(monitor.id, MONITOR_ID);

    let analyzer_ids = client.get_analyzer_ids(MONITOR_ID).unwrap().unwrap();
    assert_eq!(
        analyzer_ids,
        vec!["some_long_and_descriptive_id-analyzer".to_string()]
    );

    let analyzers = client.get_analyzers(MONITOR_ID).unwrap().unwrap();
    assert_eq!(analyzers.len(), 1);
    assert_eq!(analyzers[0].id, analyzer_ids[0]);

    let config = client.get_monitor_config().unwrap().unwrap();
    assert_eq!(config["monitors"][0]["id"], MONITOR_ID);

    assert_eq!(
        client.get_model_granularity().unwrap(),
        Some(Granularity::Daily)
    );
}

#[test]
fn test_delete_monitor() {
    let helper = helper_with_stored_monitor();
    let client = helper.client();
    helper.api.clear_calls();

    client.delete_monitor(MONITOR_ID).unwrap();

    assert_eq!(
        helper.api.paths_for("DELETE"),
        vec![
            "v0/organizations/org-0/monitor-config/v3/model-7/analyzer/some_long_and_descriptive_id-analyzer"
                .to_string(),
            "v0/organizations/org-0/monitor-config/v3/model-7/monitor/some_long_and_descriptive_id"
                .to_string(),
        ]
    );
    assert!(helper.api.monitor(MONITOR_ID).is_none());

    // a second delete is a no-op
    client.delete_monitor(MONITOR_ID).unwrap();
}

#[test]
fn test_delete_monitor_with_missing_analyzer() {
    let (monitor, _) = stored_stddev_pair(MONITOR_ID);
    let helper = TestHelper::with_api(MockWhyLabsApi::new().with_monitor(monitor));

    helper.client().delete_monitor(MONITOR_ID).unwrap();
    assert!(helper.api.monitor(MONITOR_ID).is_none());
}

#[test]
fn test_update_model_metadata_keeps_unset_values() {
    let helper = TestHelper::new();
    let client = helper.client();

    let updated = client
        .update_model_metadata(Some(TimePeriod::Monthly), None)
        .unwrap();
    assert_eq!(updated.name, "mock model");
    assert_eq!(updated.time_period, TimePeriod::Monthly);
    assert!(updated.model_type.is_none());

    let updated = client
        .update_model_metadata(None, Some("CLASSIFICATION"))
        .unwrap();
    assert_eq!(updated.time_period, TimePeriod::Monthly);
    assert_eq!(updated.model_type.as_deref(), Some("CLASSIFICATION"));
    assert_eq!(helper.api.model(), Some(updated));
}

#[test]
fn test_update_model_metadata_without_model() {
    let helper = TestHelper::with_api(MockWhyLabsApi::empty());
    let result = helper
        .client()
        .update_model_metadata(Some(TimePeriod::Daily), None);
    assert!(matches!(result, Err(MonitorError::NotFound(_))));
}

#[test]
fn test_delete_profiles_for_period() {
    let helper = TestHelper::new();
    let client = helper.client();

    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    client.delete_all_profiles_for_period(start, end).unwrap();
    client
        .delete_all_profiles_for_period(1672531200000i64, 1672617600000i64)
        .unwrap();

    let requests = helper.api.deleted_profiles();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    assert_eq!(requests[0].profile_start_timestamp, 1672531200000);
    assert_eq!(requests[0].profile_end_timestamp, 1672617600000);

    assert!(matches!(
        client.delete_all_profiles_for_period(end, start),
        Err(MonitorError::Validation(_))
    ));
    assert_eq!(helper.api.deleted_profiles().len(), 2);
}

#[test]
fn test_update_column_classifiers() {
    let helper = TestHelper::new();
    let update = UpdateColumnClassifiers {
        inputs: vec!["prediction".to_string()],
        outputs: vec!["income".to_string(), "unknown".to_string()],
    };

    let schema = update.update(&helper.client()).unwrap();

    assert_eq!(
        schema.columns["prediction"].classifier,
        Some(ColumnClassifier::Input)
    );
    assert_eq!(
        schema.columns["income"].classifier,
        Some(ColumnClassifier::Output)
    );
    assert!(!schema.has_column("unknown"));
    assert_eq!(helper.api.entity_schema(), Some(schema));
}

#[test]
fn test_invalid_entity_update_is_not_sent() {
    let helper = TestHelper::new();
    helper.api.clear_calls();

    let update = UpdateColumnClassifiers {
        inputs: vec!["age".to_string()],
        outputs: vec!["age".to_string()],
    };
    assert!(matches!(
        update.update(&helper.client()),
        Err(MonitorError::Validation(_))
    ));
    assert!(helper.api.calls().is_empty());
}

#[test]
fn test_update_data_types_and_discreteness() {
    let helper = TestHelper::new();
    let client = helper.client();

    let mut columns = BTreeMap::new();
    columns.insert("age".to_string(), ColumnDataType::Fractional);
    UpdateEntityDataTypes { columns }.update(&client).unwrap();

    UpdateColumnsDiscreteness {
        discrete: vec!["age".to_string()],
        continuous: vec!["state".to_string()],
    }
    .update(&client)
    .unwrap();

    let schema = helper.api.entity_schema().unwrap();
    assert_eq!(schema.columns["age"].data_type, ColumnDataType::Fractional);
    assert_eq!(
        schema.columns["age"].discreteness,
        ColumnDiscreteness::Discrete
    );
    assert_eq!(
        schema.columns["state"].discreteness,
        ColumnDiscreteness::Continuous
    );
}
