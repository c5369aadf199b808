use crate::error::MonitorError;
use serde::Serialize;
use whylabs_settings::WhyLabsConfig;

/// Identifies one monitor and the single analyzer that feeds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorCredentials {
    pub monitor_id: String,
    pub dataset_id: String,
    pub org_id: String,
    pub analyzer_id: String,
}

impl MonitorCredentials {
    /// Resolves org and dataset ids from `config` when not passed explicitly
    pub fn new(
        monitor_id: &str,
        dataset_id: Option<&str>,
        config: &WhyLabsConfig,
    ) -> Result<Self, MonitorError> {
        let org_id = config.org_id()?.to_string();
        let dataset_id = config.resolve_dataset_id(dataset_id)?.to_string();

        Ok(MonitorCredentials {
            monitor_id: monitor_id.to_string(),
            dataset_id,
            org_id,
            analyzer_id: analyzer_id_for(monitor_id),
        })
    }
}

pub fn analyzer_id_for(monitor_id: &str) -> String {
    format!("{monitor_id}-analyzer")
}
