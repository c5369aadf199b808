pub mod entity_schema;
pub mod models;
pub mod monitor_helpers;
pub mod profiles;

use crate::error::MonitorError;
use std::sync::Arc;
use tracing::warn;
use whylabs_http::WhyLabsApi;
use whylabs_settings::WhyLabsConfig;

pub use entity_schema::{
    UpdateColumnClassifiers, UpdateColumnsDiscreteness, UpdateEntity, UpdateEntityDataTypes,
};
pub use profiles::ToEpochMillis;

/// One dataset of an organization and the API used to reach it
#[derive(Clone)]
pub struct DatasetClient {
    api: Arc<dyn WhyLabsApi>,
    pub org_id: String,
    pub dataset_id: String,
}

impl DatasetClient {
    pub fn new(
        api: Arc<dyn WhyLabsApi>,
        config: &WhyLabsConfig,
        dataset_id: Option<&str>,
    ) -> Result<Self, MonitorError> {
        Ok(DatasetClient {
            api,
            org_id: config.org_id()?.to_string(),
            dataset_id: config.resolve_dataset_id(dataset_id)?.to_string(),
        })
    }

    pub fn api(&self) -> &dyn WhyLabsApi {
        self.api.as_ref()
    }
}

impl std::fmt::Debug for DatasetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetClient")
            .field("org_id", &self.org_id)
            .field("dataset_id", &self.dataset_id)
            .finish()
    }
}

/// Read helpers answer `None` for missing resources
pub(crate) fn optional<T>(
    result: Result<T, MonitorError>,
    what: &str,
) -> Result<Option<T>, MonitorError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MonitorError::NotFound(path)) => {
            warn!("{} not found at {}", what, path);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Delete helpers ignore missing resources
pub(crate) fn ignore_missing(
    result: Result<(), MonitorError>,
    what: &str,
) -> Result<(), MonitorError> {
    match result {
        Err(MonitorError::NotFound(path)) => {
            warn!("{} already absent at {}", what, path);
            Ok(())
        }
        other => other,
    }
}
