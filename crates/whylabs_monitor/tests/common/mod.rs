use std::sync::Arc;
use whylabs_http::WhyLabsApi;
use whylabs_mocks::{init_tracing, MockWhyLabsApi, MOCK_DATASET_ID, MOCK_ORG_ID};
use whylabs_monitor::{DatasetClient, MonitorCredentials, MonitorSetup};
use whylabs_settings::WhyLabsConfig;
use whylabs_types::{
    Analyzer, Baseline, Cadence, ColumnMatrix, DiffConfig, DiffMode, Monitor, MonitorMode,
    Schedule, SimpleColumnMetric, StddevConfig,
};

pub const MONITOR_ID: &str = "some_long_and_descriptive_id";

pub struct TestHelper {
    pub api: Arc<MockWhyLabsApi>,
}

impl TestHelper {
    pub fn new() -> Self {
        Self::with_api(MockWhyLabsApi::new())
    }

    pub fn with_api(api: MockWhyLabsApi) -> Self {
        init_tracing();
        TestHelper { api: Arc::new(api) }
    }

    pub fn config() -> WhyLabsConfig {
        WhyLabsConfig::new(
            Some("test-api-key".to_string()),
            Some("http://localhost:8000".to_string()),
            Some(MOCK_ORG_ID.to_string()),
            Some(MOCK_DATASET_ID.to_string()),
        )
    }

    pub fn dyn_api(&self) -> Arc<dyn WhyLabsApi> {
        self.api.clone()
    }

    pub fn credentials(&self, monitor_id: &str) -> MonitorCredentials {
        MonitorCredentials::new(monitor_id, Some(MOCK_DATASET_ID), &Self::config()).unwrap()
    }

    pub fn setup(&self, monitor_id: &str) -> MonitorSetup {
        MonitorSetup::new(self.dyn_api(), self.credentials(monitor_id)).unwrap()
    }

    pub fn client(&self) -> DatasetClient {
        DatasetClient::new(self.dyn_api(), &Self::config(), None).unwrap()
    }
}

pub fn median_diff() -> DiffConfig {
    DiffConfig::new(
        SimpleColumnMetric::Median,
        DiffMode::Pct,
        12.0,
        Baseline::trailing_window(14),
    )
}

/// A stored analyzer and monitor pair as the platform would return them
pub fn stored_stddev_pair(monitor_id: &str) -> (Monitor, Analyzer) {
    let analyzer_id = format!("{monitor_id}-analyzer");

    let mut analyzer = Analyzer::new(
        &analyzer_id,
        ColumnMatrix::new(vec!["age".to_string()], vec![], vec![]).into(),
        StddevConfig::new(SimpleColumnMetric::Mean, Baseline::trailing_window(7)).into(),
    );
    analyzer.schedule = Some(Schedule::fixed(Cadence::Daily));
    analyzer.tags = Some(vec!["stored".to_string()]);
    analyzer.data_readiness_duration = Some("PT6H".to_string());

    let mut monitor = Monitor::new(monitor_id, vec![analyzer_id], MonitorMode::default());
    monitor.tags = Some(vec!["team-risk".to_string()]);

    (monitor, analyzer)
}
