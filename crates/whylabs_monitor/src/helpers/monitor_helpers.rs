use crate::error::MonitorError;
use crate::helpers::{ignore_missing, optional, DatasetClient};
use serde_json::Value;
use tracing::{debug, instrument};
use whylabs_types::{Analyzer, Granularity, Monitor};

impl DatasetClient {
    /// The whole monitor configuration document of the dataset
    pub fn get_monitor_config(&self) -> Result<Option<Value>, MonitorError> {
        optional(
            self.api()
                .get_monitor_config(&self.org_id, &self.dataset_id)
                .map_err(MonitorError::from),
            "Monitor config",
        )
    }

    pub fn get_monitor(&self, monitor_id: &str) -> Result<Option<Monitor>, MonitorError> {
        optional(
            self.api()
                .get_monitor(&self.org_id, &self.dataset_id, monitor_id)
                .map_err(MonitorError::from),
            "Monitor",
        )
    }

    /// Analyzer ids the monitor references, as listed in the monitor config
    pub fn get_analyzer_ids(&self, monitor_id: &str) -> Result<Option<Vec<String>>, MonitorError> {
        let Some(config) = self.get_monitor_config()? else {
            return Ok(None);
        };

        let entry = config
            .get("monitors")
            .and_then(Value::as_array)
            .and_then(|monitors| {
                monitors
                    .iter()
                    .find(|monitor| monitor.get("id").and_then(Value::as_str) == Some(monitor_id))
            });

        let Some(entry) = entry else {
            debug!("Monitor {} is not part of the monitor config", monitor_id);
            return Ok(None);
        };

        let analyzer_ids = entry
            .get("analyzerIds")
            .cloned()
            .map(serde_json::from_value::<Vec<String>>)
            .transpose()?;
        Ok(analyzer_ids)
    }

    /// Analyzers feeding the monitor. Ids that no longer resolve are skipped.
    pub fn get_analyzers(&self, monitor_id: &str) -> Result<Option<Vec<Analyzer>>, MonitorError> {
        let Some(analyzer_ids) = self.get_analyzer_ids(monitor_id)? else {
            return Ok(None);
        };

        let mut analyzers = vec![];
        for analyzer_id in analyzer_ids {
            let analyzer = optional(
                self.api()
                    .get_analyzer(&self.org_id, &self.dataset_id, &analyzer_id)
                    .map_err(MonitorError::from),
                "Analyzer",
            )?;
            analyzers.extend(analyzer);
        }
        Ok(Some(analyzers))
    }

    pub fn get_model_granularity(&self) -> Result<Option<Granularity>, MonitorError> {
        let model = optional(
            self.api()
                .get_model(&self.org_id, &self.dataset_id)
                .map_err(MonitorError::from),
            "Model",
        )?;
        Ok(model.map(|model| model.granularity()))
    }

    /// Deletes the analyzers of the monitor, then the monitor itself
    #[instrument(skip_all)]
    pub fn delete_monitor(&self, monitor_id: &str) -> Result<(), MonitorError> {
        let Some(analyzer_ids) = self.get_analyzer_ids(monitor_id)? else {
            debug!("No analyzers found for monitor {}", monitor_id);
            return Ok(());
        };

        for analyzer_id in analyzer_ids {
            ignore_missing(
                self.api()
                    .delete_analyzer(&self.org_id, &self.dataset_id, &analyzer_id)
                    .map_err(MonitorError::from),
                "Analyzer",
            )?;
            debug!("Deleted analyzer {}", analyzer_id);
        }

        ignore_missing(
            self.api()
                .delete_monitor(&self.org_id, &self.dataset_id, monitor_id)
                .map_err(MonitorError::from),
            "Monitor",
        )?;
        debug!("Deleted monitor {}", monitor_id);
        Ok(())
    }
}
