use crate::common::{median_diff, TestHelper, MONITOR_ID};
use serde_json::{json, Value};
use whylabs_mocks::{MockWhyLabsApi, MOCK_DATASET_ID, MOCK_ORG_ID};
use whylabs_monitor::{MonitorError, MonitorManager, SetupStatus};
use whylabs_types::schema::validate_document;
use whylabs_types::{Document, Granularity, MonitorAction, NotificationActionType, TimePeriod};

fn applied_manager(helper: &TestHelper) -> MonitorManager {
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(median_diff());
    setup.apply().unwrap();
    MonitorManager::new(setup)
}

#[test]
fn test_dump_matches_expected_document() {
    let helper = TestHelper::new();
    let mut manager = applied_manager(&helper);

    let dumped: Value = serde_json::from_str(&manager.dump().unwrap()).unwrap();

    let expected = json!({
        "schemaVersion": 1,
        "orgId": MOCK_ORG_ID,
        "datasetId": MOCK_DATASET_ID,
        "granularity": "daily",
        "analyzers": [{
            "id": "some_long_and_descriptive_id-analyzer",
            "displayName": "some_long_and_descriptive_id-analyzer",
            "schedule": {"type": "fixed", "cadence": "daily"},
            "targetMatrix": {"type": "column", "include": ["*"], "exclude": [], "segments": []},
            "config": {
                "type": "diff",
                "metric": "median",
                "mode": "pct",
                "threshold": 12.0,
                "baseline": {"type": "TrailingWindow", "size": 14}
            }
        }],
        "monitors": [{
            "id": "some_long_and_descriptive_id",
            "displayName": "some_long_and_descriptive_id",
            "analyzerIds": ["some_long_and_descriptive_id-analyzer"],
            "schedule": {"type": "immediate"},
            "disabled": false,
            "severity": 3,
            "mode": {"type": "DIGEST"},
            "actions": []
        }]
    });
    assert_eq!(dumped, expected);

    // no nulls anywhere and the dump passes the bundled schema
    assert!(!manager.dump().unwrap().contains("null"));
    validate_document(&dumped).unwrap();

    let document: Document = serde_json::from_value(dumped).unwrap();
    assert_eq!(document.granularity, Granularity::Daily);
}

#[test]
fn test_dump_before_apply() {
    let helper = TestHelper::new();
    let mut manager = MonitorManager::new(helper.setup(MONITOR_ID));

    assert!(matches!(manager.dump(), Err(MonitorError::NotApplied)));
    assert!(matches!(manager.validate(), Err(MonitorError::NotApplied)));
    assert!(helper.api.monitor(MONITOR_ID).is_none());
}

#[test]
fn test_validate() {
    let helper = TestHelper::new();
    let mut manager = applied_manager(&helper);
    assert!(manager.validate().unwrap());
}

#[test]
fn test_validate_rejects_short_ids() {
    let helper = TestHelper::new();
    let mut setup = helper.setup("short");
    setup.set_config(median_diff());
    setup.apply().unwrap();

    let mut manager = MonitorManager::new(setup);
    assert!(matches!(manager.validate(), Err(MonitorError::Validation(_))));
    assert!(matches!(manager.save(), Err(MonitorError::Validation(_))));
    assert!(helper.api.paths_for("PUT").is_empty());
}

#[test]
fn test_actions_are_registered_and_rewritten() {
    let helper = TestHelper::with_api(
        MockWhyLabsApi::new()
            .with_notification_action("slack-alerts", NotificationActionType::Slack),
    );
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(median_diff());
    setup.set_actions(vec![
        MonitorAction::slack("slack-alerts", "https://hooks.slack.com/services/x"),
        MonitorAction::email("email-oncall", "oncall@example.com"),
        MonitorAction::pager_duty("pager-oncall", "pd-routing-key"),
        MonitorAction::global("existing-webhook"),
    ]);
    setup.apply().unwrap();

    let mut manager = MonitorManager::new(setup);
    assert!(manager.validate().unwrap());

    assert_eq!(
        helper.api.paths_for("PUT"),
        vec![
            "v1/organizations/org-0/notification-settings/actions/EMAIL/email-oncall".to_string(),
            "v1/organizations/org-0/notification-settings/actions/PAGER_DUTY/pager-oncall"
                .to_string(),
        ]
    );

    let registered = helper.api.notification_actions();
    let email = registered
        .iter()
        .find(|action| action.id == "email-oncall")
        .unwrap();
    assert_eq!(email.payload, Some(json!({"email": "oncall@example.com"})));
    let pager = registered
        .iter()
        .find(|action| action.id == "pager-oncall")
        .unwrap();
    assert_eq!(pager.payload, Some(json!({"pagerDutyKey": "pd-routing-key"})));

    assert_eq!(
        manager.setup().monitor().unwrap().actions,
        vec![
            MonitorAction::global("slack-alerts"),
            MonitorAction::global("email-oncall"),
            MonitorAction::global("pager-oncall"),
            MonitorAction::global("existing-webhook"),
        ]
    );

    // a second dump finds nothing left to register
    helper.api.clear_calls();
    manager.dump().unwrap();
    assert!(helper.api.paths_for("PUT").is_empty());
}

#[test]
fn test_save_writes_analyzer_then_monitor() {
    let helper = TestHelper::new();
    let mut manager = applied_manager(&helper);
    helper.api.clear_calls();

    manager.save().unwrap();

    assert_eq!(
        helper.api.paths_for("PUT"),
        vec![
            "v0/organizations/org-0/monitor-config/v3/model-7/analyzer/some_long_and_descriptive_id-analyzer"
                .to_string(),
            "v0/organizations/org-0/monitor-config/v3/model-7/monitor/some_long_and_descriptive_id"
                .to_string(),
        ]
    );
    assert!(helper.api.paths_for("PATCH").is_empty());
    assert_eq!(manager.setup().status(), SetupStatus::Saved);

    let stored = helper.api.monitor(MONITOR_ID).unwrap();
    assert_eq!(Some(&stored), manager.setup().monitor());
    assert!(helper
        .api
        .analyzer("some_long_and_descriptive_id-analyzer")
        .is_some());
}

#[test]
fn test_saved_monitor_is_loaded_by_next_setup() {
    let helper = TestHelper::new();
    let mut manager = applied_manager(&helper);
    manager.save().unwrap();

    let setup = helper.setup(MONITOR_ID);
    assert_eq!(setup.existing_monitor(), manager.setup().monitor());
    assert_eq!(setup.existing_analyzer(), manager.setup().analyzer());
}

#[test]
fn test_eager_flag_is_patched_when_changed() {
    let helper = TestHelper::new();
    let mut manager = applied_manager(&helper).with_eager(true);

    let dumped: Value = serde_json::from_str(&manager.dump().unwrap()).unwrap();
    assert_eq!(dumped["allowPartialTargetBatches"], json!(true));

    manager.save().unwrap();
    assert_eq!(
        helper.api.paths_for("PATCH"),
        vec!["v0/organizations/org-0/monitor-config/v3/model-7".to_string()]
    );
    assert_eq!(
        helper.api.last_patch_body(),
        Some(json!({"allowPartialTargetBatches": true}))
    );
    assert_eq!(
        helper.api.monitor(MONITOR_ID).as_ref(),
        manager.setup().monitor()
    );
    assert_eq!(
        helper.api.config_value("allowPartialTargetBatches"),
        Some(json!(true))
    );

    // already stored, nothing to patch
    helper.api.clear_calls();
    manager.save().unwrap();
    assert!(helper.api.paths_for("PATCH").is_empty());
}

#[test]
fn test_eager_flag_is_left_alone_when_equal() {
    let helper = TestHelper::with_api(
        MockWhyLabsApi::new().with_config_value("allowPartialTargetBatches", json!(false)),
    );
    let mut manager = applied_manager(&helper).with_eager(false);

    manager.save().unwrap();

    assert_eq!(
        helper.api.paths_for("GET").last().map(String::as_str),
        Some("v0/organizations/org-0/monitor-config/v3/model-7")
    );
    assert!(helper.api.paths_for("PATCH").is_empty());
}

#[test]
fn test_remote_failures_surface() {
    let helper = TestHelper::with_api(MockWhyLabsApi::new().with_write_failure(503));
    let mut manager = applied_manager(&helper);

    match manager.save() {
        Err(MonitorError::RemoteApi(error)) => assert!(error.to_string().contains("503")),
        other => panic!("expected a remote api error, got {other:?}"),
    }
    assert_ne!(manager.setup().status(), SetupStatus::Saved);
}

#[test]
fn test_granularity_without_model() {
    let helper = TestHelper::with_api(MockWhyLabsApi::empty());
    let mut setup = helper.setup(MONITOR_ID);
    setup.set_config(median_diff());

    assert!(matches!(setup.apply(), Err(MonitorError::Granularity(_))));

    let manager = MonitorManager::new(setup);
    assert!(matches!(
        manager.get_granularity(),
        Err(MonitorError::Granularity(_))
    ));
}

#[test]
fn test_get_granularity() {
    let helper = TestHelper::with_api(MockWhyLabsApi::new().with_model(TimePeriod::Weekly));
    let manager = MonitorManager::new(helper.setup(MONITOR_ID));
    assert_eq!(manager.get_granularity().unwrap(), Granularity::Weekly);
}

#[test]
fn test_dump_to_file() {
    let helper = TestHelper::new();
    let mut manager = applied_manager(&helper);
    let dir = tempfile::tempdir().unwrap();

    let path = manager
        .dump_to_file(Some(dir.path().join("monitors").join("median")))
        .unwrap();

    assert_eq!(path, dir.path().join("monitors").join("median.json"));
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["monitors"][0]["id"], MONITOR_ID);
}
