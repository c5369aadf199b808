use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use whylabs_http::error::ClientError;
use whylabs_http::WhyLabsApi;
use whylabs_types::http::{DeleteProfilesRequest, Routes, UpdateModelRequest};
use whylabs_types::{
    Analyzer, ColumnClassifier, ColumnDataType, ColumnDiscreteness, ColumnSchema, EntitySchema,
    ModelMetadata, Monitor, NotificationAction, NotificationActionType, TimePeriod,
};

pub const MOCK_ORG_ID: &str = "org-0";
pub const MOCK_DATASET_ID: &str = "model-7";

/// A request the mock received, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
}

#[derive(Debug, Default)]
struct MockState {
    monitors: BTreeMap<String, Monitor>,
    analyzers: BTreeMap<String, Analyzer>,
    config: Map<String, Value>,
    entity_schema: Option<EntitySchema>,
    model: Option<ModelMetadata>,
    actions: Vec<NotificationAction>,
    deleted_profiles: Vec<DeleteProfilesRequest>,
    patch_bodies: Vec<Value>,
    write_failure: Option<u16>,
    calls: Vec<RecordedCall>,
}

impl MockState {
    fn record(&mut self, method: &'static str, route: Routes) {
        let path = route.as_path();
        debug!("mock {} {}", method, path);
        self.calls.push(RecordedCall { method, path });
    }

    fn check_write(&self) -> Result<(), ClientError> {
        match self.write_failure {
            Some(status) => Err(ClientError::RemoteApi {
                status,
                message: "mock write failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn monitor_config(&self, org_id: &str, dataset_id: &str) -> Result<Value, ClientError> {
        let mut document = self.config.clone();
        document
            .entry("orgId")
            .or_insert_with(|| json!(org_id));
        document
            .entry("datasetId")
            .or_insert_with(|| json!(dataset_id));
        if let Some(model) = &self.model {
            document
                .entry("granularity")
                .or_insert_with(|| json!(model.granularity()));
        }
        document.insert(
            "analyzers".to_string(),
            serde_json::to_value(self.analyzers.values().collect::<Vec<_>>())?,
        );
        document.insert(
            "monitors".to_string(),
            serde_json::to_value(self.monitors.values().collect::<Vec<_>>())?,
        );
        Ok(Value::Object(document))
    }
}

/// In-memory stand-in for the WhyLabs API holding a single dataset.
///
/// Org and dataset arguments only shape the recorded paths.
#[derive(Debug, Default)]
pub struct MockWhyLabsApi {
    state: Mutex<MockState>,
}

fn column(
    data_type: ColumnDataType,
    discreteness: ColumnDiscreteness,
    classifier: ColumnClassifier,
) -> ColumnSchema {
    ColumnSchema {
        classifier: Some(classifier),
        data_type,
        discreteness,
    }
}

/// Columns of the default mock dataset
pub fn default_entity_schema() -> EntitySchema {
    let mut columns = BTreeMap::new();
    columns.insert(
        "age".to_string(),
        column(
            ColumnDataType::Integral,
            ColumnDiscreteness::Continuous,
            ColumnClassifier::Input,
        ),
    );
    columns.insert(
        "income".to_string(),
        column(
            ColumnDataType::Fractional,
            ColumnDiscreteness::Continuous,
            ColumnClassifier::Input,
        ),
    );
    columns.insert(
        "state".to_string(),
        column(
            ColumnDataType::String,
            ColumnDiscreteness::Discrete,
            ColumnClassifier::Input,
        ),
    );
    columns.insert(
        "prediction".to_string(),
        column(
            ColumnDataType::Integral,
            ColumnDiscreteness::Discrete,
            ColumnClassifier::Output,
        ),
    );
    EntitySchema {
        metadata: None,
        columns,
    }
}

impl MockWhyLabsApi {
    /// A daily dataset with four columns and no monitors
    pub fn new() -> Self {
        Self::empty()
            .with_model(TimePeriod::Daily)
            .with_entity_schema(default_entity_schema())
    }

    /// Nothing stored, every read answers not found
    pub fn empty() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_model(self, time_period: TimePeriod) -> Self {
        self.state().model = Some(ModelMetadata {
            id: MOCK_DATASET_ID.to_string(),
            org_id: Some(MOCK_ORG_ID.to_string()),
            name: "mock model".to_string(),
            time_period,
            model_type: None,
            creation_time: None,
        });
        self
    }

    pub fn with_entity_schema(self, schema: EntitySchema) -> Self {
        self.state().entity_schema = Some(schema);
        self
    }

    pub fn with_monitor(self, monitor: Monitor) -> Self {
        self.state().monitors.insert(monitor.id.clone(), monitor);
        self
    }

    pub fn with_analyzer(self, analyzer: Analyzer) -> Self {
        self.state().analyzers.insert(analyzer.id.clone(), analyzer);
        self
    }

    pub fn with_notification_action(self, id: &str, action_type: NotificationActionType) -> Self {
        self.state().actions.push(NotificationAction {
            id: id.to_string(),
            action_type: Some(action_type.as_str().to_string()),
            enabled: Some(true),
            payload: None,
        });
        self
    }

    /// Sets a top level field of the stored monitor config document
    pub fn with_config_value(self, key: &str, value: Value) -> Self {
        self.state().config.insert(key.to_string(), value);
        self
    }

    /// Every PUT and PATCH fails with `status`
    pub fn with_write_failure(self, status: u16) -> Self {
        self.state().write_failure = Some(status);
        self
    }

    pub fn monitor(&self, monitor_id: &str) -> Option<Monitor> {
        self.state().monitors.get(monitor_id).cloned()
    }

    pub fn analyzer(&self, analyzer_id: &str) -> Option<Analyzer> {
        self.state().analyzers.get(analyzer_id).cloned()
    }

    pub fn config_value(&self, key: &str) -> Option<Value> {
        self.state().config.get(key).cloned()
    }

    pub fn entity_schema(&self) -> Option<EntitySchema> {
        self.state().entity_schema.clone()
    }

    pub fn model(&self) -> Option<ModelMetadata> {
        self.state().model.clone()
    }

    pub fn notification_actions(&self) -> Vec<NotificationAction> {
        self.state().actions.clone()
    }

    pub fn deleted_profiles(&self) -> Vec<DeleteProfilesRequest> {
        self.state().deleted_profiles.clone()
    }

    /// Body of the most recent monitor config PATCH
    pub fn last_patch_body(&self) -> Option<Value> {
        self.state().patch_bodies.last().cloned()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Paths of recorded calls made with `method`
    pub fn paths_for(&self, method: &str) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter(|call| call.method == method)
            .map(|call| call.path.clone())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

impl WhyLabsApi for MockWhyLabsApi {
    fn get_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
    ) -> Result<Monitor, ClientError> {
        let mut state = self.state();
        let route = Routes::Monitor {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            monitor_id: monitor_id.to_string(),
        };
        let path = route.as_path();
        state.record("GET", route);
        state
            .monitors
            .get(monitor_id)
            .cloned()
            .ok_or(ClientError::NotFound(path))
    }

    fn put_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
        monitor: &Monitor,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        state.record(
            "PUT",
            Routes::Monitor {
                org_id: org_id.to_string(),
                dataset_id: dataset_id.to_string(),
                monitor_id: monitor_id.to_string(),
            },
        );
        state.check_write()?;
        state
            .monitors
            .insert(monitor_id.to_string(), monitor.clone());
        Ok(())
    }

    fn delete_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        let route = Routes::Monitor {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            monitor_id: monitor_id.to_string(),
        };
        let path = route.as_path();
        state.record("DELETE", route);
        state
            .monitors
            .remove(monitor_id)
            .map(|_| ())
            .ok_or(ClientError::NotFound(path))
    }

    fn get_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
    ) -> Result<Analyzer, ClientError> {
        let mut state = self.state();
        let route = Routes::Analyzer {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            analyzer_id: analyzer_id.to_string(),
        };
        let path = route.as_path();
        state.record("GET", route);
        state
            .analyzers
            .get(analyzer_id)
            .cloned()
            .ok_or(ClientError::NotFound(path))
    }

    fn put_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
        analyzer: &Analyzer,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        state.record(
            "PUT",
            Routes::Analyzer {
                org_id: org_id.to_string(),
                dataset_id: dataset_id.to_string(),
                analyzer_id: analyzer_id.to_string(),
            },
        );
        state.check_write()?;
        state
            .analyzers
            .insert(analyzer_id.to_string(), analyzer.clone());
        Ok(())
    }

    fn delete_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        let route = Routes::Analyzer {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            analyzer_id: analyzer_id.to_string(),
        };
        let path = route.as_path();
        state.record("DELETE", route);
        state
            .analyzers
            .remove(analyzer_id)
            .map(|_| ())
            .ok_or(ClientError::NotFound(path))
    }

    fn get_monitor_config(&self, org_id: &str, dataset_id: &str) -> Result<Value, ClientError> {
        let mut state = self.state();
        state.record(
            "GET",
            Routes::MonitorConfig {
                org_id: org_id.to_string(),
                dataset_id: dataset_id.to_string(),
            },
        );
        state.monitor_config(org_id, dataset_id)
    }

    fn patch_monitor_config(
        &self,
        org_id: &str,
        dataset_id: &str,
        config: &Value,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        state.record(
            "PATCH",
            Routes::MonitorConfig {
                org_id: org_id.to_string(),
                dataset_id: dataset_id.to_string(),
            },
        );
        state.check_write()?;

        let Some(fields) = config.as_object() else {
            return Err(ClientError::RemoteApi {
                status: 400,
                message: "monitor config must be an object".to_string(),
            });
        };
        state.patch_bodies.push(config.clone());

        for (key, value) in fields {
            match key.as_str() {
                "analyzers" => {
                    let analyzers: Vec<Analyzer> = serde_json::from_value(value.clone())?;
                    state.analyzers = analyzers
                        .into_iter()
                        .map(|analyzer| (analyzer.id.clone(), analyzer))
                        .collect();
                }
                "monitors" => {
                    let monitors: Vec<Monitor> = serde_json::from_value(value.clone())?;
                    state.monitors = monitors
                        .into_iter()
                        .map(|monitor| (monitor.id.clone(), monitor))
                        .collect();
                }
                _ => {
                    state.config.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    fn get_entity_schema(
        &self,
        org_id: &str,
        dataset_id: &str,
    ) -> Result<EntitySchema, ClientError> {
        let mut state = self.state();
        let route = Routes::EntitySchema {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        let path = route.as_path();
        state.record("GET", route);
        state
            .entity_schema
            .clone()
            .ok_or(ClientError::NotFound(path))
    }

    fn put_entity_schema(
        &self,
        org_id: &str,
        dataset_id: &str,
        schema: &EntitySchema,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        state.record(
            "PUT",
            Routes::EntitySchema {
                org_id: org_id.to_string(),
                dataset_id: dataset_id.to_string(),
            },
        );
        state.check_write()?;
        state.entity_schema = Some(schema.clone());
        Ok(())
    }

    fn get_model(&self, org_id: &str, dataset_id: &str) -> Result<ModelMetadata, ClientError> {
        let mut state = self.state();
        let route = Routes::Model {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        let path = route.as_path();
        state.record("GET", route);
        state.model.clone().ok_or(ClientError::NotFound(path))
    }

    fn update_model(
        &self,
        org_id: &str,
        dataset_id: &str,
        request: &UpdateModelRequest,
    ) -> Result<ModelMetadata, ClientError> {
        let mut state = self.state();
        state.record(
            "PUT",
            Routes::Model {
                org_id: org_id.to_string(),
                dataset_id: dataset_id.to_string(),
            },
        );
        state.check_write()?;

        let time_period = request
            .time_period
            .parse::<TimePeriod>()
            .map_err(|e| ClientError::RemoteApi {
                status: 400,
                message: e.to_string(),
            })?;

        let model = ModelMetadata {
            id: dataset_id.to_string(),
            org_id: Some(org_id.to_string()),
            name: request.model_name.clone(),
            time_period,
            model_type: request.model_type.clone(),
            creation_time: state.model.as_ref().and_then(|model| model.creation_time),
        };
        state.model = Some(model.clone());
        Ok(model)
    }

    fn list_notification_actions(
        &self,
        org_id: &str,
    ) -> Result<Vec<NotificationAction>, ClientError> {
        let mut state = self.state();
        state.record(
            "GET",
            Routes::NotificationActions {
                org_id: org_id.to_string(),
            },
        );
        Ok(state.actions.clone())
    }

    fn put_notification_action(
        &self,
        org_id: &str,
        action_type: NotificationActionType,
        action_id: &str,
        payload: &Value,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        state.record(
            "PUT",
            Routes::NotificationAction {
                org_id: org_id.to_string(),
                action_type: action_type.as_str().to_string(),
                action_id: action_id.to_string(),
            },
        );
        state.check_write()?;
        state.actions.retain(|action| action.id != action_id);
        state.actions.push(NotificationAction {
            id: action_id.to_string(),
            action_type: Some(action_type.as_str().to_string()),
            enabled: Some(true),
            payload: Some(payload.clone()),
        });
        Ok(())
    }

    fn delete_dataset_profiles(
        &self,
        org_id: &str,
        dataset_id: &str,
        request: &DeleteProfilesRequest,
    ) -> Result<Value, ClientError> {
        let mut state = self.state();
        state.record(
            "DELETE",
            Routes::DatasetProfiles {
                org_id: org_id.to_string(),
                dataset_id: dataset_id.to_string(),
            },
        );
        state.deleted_profiles.push(request.clone());
        Ok(json!({
            "id": format!("delete-request-{}", state.deleted_profiles.len()),
            "datasetId": dataset_id,
        }))
    }
}
