use crate::error::MonitorError;
use crate::helpers::DatasetClient;
use tracing::{debug, instrument};
use whylabs_types::http::UpdateModelRequest;
use whylabs_types::{ModelMetadata, TimePeriod};

impl DatasetClient {
    /// Updates the time period and model type, keeping stored values for
    /// arguments left unset
    #[instrument(skip_all)]
    pub fn update_model_metadata(
        &self,
        time_period: Option<TimePeriod>,
        model_type: Option<&str>,
    ) -> Result<ModelMetadata, MonitorError> {
        let current = self.api().get_model(&self.org_id, &self.dataset_id)?;
        debug!("Updating dataset {} from {:?}", self.dataset_id, current);

        let request = UpdateModelRequest {
            model_name: current.name.clone(),
            time_period: time_period
                .unwrap_or(current.time_period)
                .as_str()
                .to_string(),
            model_type: model_type
                .map(str::to_string)
                .or_else(|| current.model_type.clone()),
        };

        let updated = self
            .api()
            .update_model(&self.org_id, &self.dataset_id, &request)?;
        debug!("Updated dataset {}", self.dataset_id);
        Ok(updated)
    }
}
