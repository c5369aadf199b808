use crate::error::ClientError;
use crate::HttpClient;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use whylabs_types::http::{DeleteProfilesRequest, RequestType, Routes, UpdateModelRequest};
use whylabs_types::{
    Analyzer, EntitySchema, ModelMetadata, Monitor, NotificationAction, NotificationActionType,
};

/// Remote operations consumed from the WhyLabs REST API.
///
/// [`HttpClient`] is the live implementation; tests swap in an in-memory one.
pub trait WhyLabsApi: Send + Sync {
    fn get_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
    ) -> Result<Monitor, ClientError>;

    fn put_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
        monitor: &Monitor,
    ) -> Result<(), ClientError>;

    fn delete_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
    ) -> Result<(), ClientError>;

    fn get_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
    ) -> Result<Analyzer, ClientError>;

    fn put_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
        analyzer: &Analyzer,
    ) -> Result<(), ClientError>;

    fn delete_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
    ) -> Result<(), ClientError>;

    /// The full monitor configuration document of a dataset, kept untyped so
    /// fields this crate does not model survive a read-modify-write cycle
    fn get_monitor_config(&self, org_id: &str, dataset_id: &str) -> Result<Value, ClientError>;

    fn patch_monitor_config(
        &self,
        org_id: &str,
        dataset_id: &str,
        config: &Value,
    ) -> Result<(), ClientError>;

    fn get_entity_schema(&self, org_id: &str, dataset_id: &str)
        -> Result<EntitySchema, ClientError>;

    fn put_entity_schema(
        &self,
        org_id: &str,
        dataset_id: &str,
        schema: &EntitySchema,
    ) -> Result<(), ClientError>;

    fn get_model(&self, org_id: &str, dataset_id: &str) -> Result<ModelMetadata, ClientError>;

    fn update_model(
        &self,
        org_id: &str,
        dataset_id: &str,
        request: &UpdateModelRequest,
    ) -> Result<ModelMetadata, ClientError>;

    fn list_notification_actions(&self, org_id: &str)
        -> Result<Vec<NotificationAction>, ClientError>;

    fn put_notification_action(
        &self,
        org_id: &str,
        action_type: NotificationActionType,
        action_id: &str,
        payload: &Value,
    ) -> Result<(), ClientError>;

    fn delete_dataset_profiles(
        &self,
        org_id: &str,
        dataset_id: &str,
        request: &DeleteProfilesRequest,
    ) -> Result<Value, ClientError>;
}

impl WhyLabsApi for HttpClient {
    #[instrument(skip_all)]
    fn get_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
    ) -> Result<Monitor, ClientError> {
        let route = Routes::Monitor {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            monitor_id: monitor_id.to_string(),
        };
        let body = self.request_json(route, RequestType::Get, None, None)?;
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip_all)]
    fn put_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
        monitor: &Monitor,
    ) -> Result<(), ClientError> {
        let route = Routes::Monitor {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            monitor_id: monitor_id.to_string(),
        };
        let body = serde_json::to_value(monitor)?;
        self.request(route, RequestType::Put, Some(body), None, None)?;
        debug!("Put monitor {}", monitor_id);
        Ok(())
    }

    #[instrument(skip_all)]
    fn delete_monitor(
        &self,
        org_id: &str,
        dataset_id: &str,
        monitor_id: &str,
    ) -> Result<(), ClientError> {
        let route = Routes::Monitor {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            monitor_id: monitor_id.to_string(),
        };
        self.request(route, RequestType::Delete, None, None, None)?;
        Ok(())
    }

    #[instrument(skip_all)]
    fn get_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
    ) -> Result<Analyzer, ClientError> {
        let route = Routes::Analyzer {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            analyzer_id: analyzer_id.to_string(),
        };
        let body = self.request_json(route, RequestType::Get, None, None)?;
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip_all)]
    fn put_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
        analyzer: &Analyzer,
    ) -> Result<(), ClientError> {
        let route = Routes::Analyzer {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            analyzer_id: analyzer_id.to_string(),
        };
        let body = serde_json::to_value(analyzer)?;
        self.request(route, RequestType::Put, Some(body), None, None)?;
        debug!("Put analyzer {}", analyzer_id);
        Ok(())
    }

    #[instrument(skip_all)]
    fn delete_analyzer(
        &self,
        org_id: &str,
        dataset_id: &str,
        analyzer_id: &str,
    ) -> Result<(), ClientError> {
        let route = Routes::Analyzer {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            analyzer_id: analyzer_id.to_string(),
        };
        self.request(route, RequestType::Delete, None, None, None)?;
        Ok(())
    }

    #[instrument(skip_all)]
    fn get_monitor_config(&self, org_id: &str, dataset_id: &str) -> Result<Value, ClientError> {
        let route = Routes::MonitorConfig {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        self.request_json(route, RequestType::Get, None, None)
    }

    #[instrument(skip_all)]
    fn patch_monitor_config(
        &self,
        org_id: &str,
        dataset_id: &str,
        config: &Value,
    ) -> Result<(), ClientError> {
        let route = Routes::MonitorConfig {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        self.request(route, RequestType::Patch, Some(config.clone()), None, None)?;
        Ok(())
    }

    #[instrument(skip_all)]
    fn get_entity_schema(
        &self,
        org_id: &str,
        dataset_id: &str,
    ) -> Result<EntitySchema, ClientError> {
        let route = Routes::EntitySchema {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        let body = self.request_json(route, RequestType::Get, None, None)?;
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip_all)]
    fn put_entity_schema(
        &self,
        org_id: &str,
        dataset_id: &str,
        schema: &EntitySchema,
    ) -> Result<(), ClientError> {
        let route = Routes::EntitySchema {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        let body = serde_json::to_value(schema)?;
        self.request(route, RequestType::Put, Some(body), None, None)?;
        Ok(())
    }

    #[instrument(skip_all)]
    fn get_model(&self, org_id: &str, dataset_id: &str) -> Result<ModelMetadata, ClientError> {
        let route = Routes::Model {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        let body = self.request_json(route, RequestType::Get, None, None)?;
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip_all)]
    fn update_model(
        &self,
        org_id: &str,
        dataset_id: &str,
        request: &UpdateModelRequest,
    ) -> Result<ModelMetadata, ClientError> {
        let route = Routes::Model {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        let query_string = serde_qs::to_string(request)?;
        let body = self.request_json(route, RequestType::Put, None, Some(query_string))?;
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip_all)]
    fn list_notification_actions(
        &self,
        org_id: &str,
    ) -> Result<Vec<NotificationAction>, ClientError> {
        let route = Routes::NotificationActions {
            org_id: org_id.to_string(),
        };
        let body = self.request_json(route, RequestType::Get, None, None)?;
        if body.is_null() {
            return Ok(vec![]);
        }
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip_all)]
    fn put_notification_action(
        &self,
        org_id: &str,
        action_type: NotificationActionType,
        action_id: &str,
        payload: &Value,
    ) -> Result<(), ClientError> {
        let route = Routes::NotificationAction {
            org_id: org_id.to_string(),
            action_type: action_type.as_str().to_string(),
            action_id: action_id.to_string(),
        };
        self.request(route, RequestType::Put, Some(payload.clone()), None, None)?;
        debug!("Registered {} notification action {}", action_type, action_id);
        Ok(())
    }

    #[instrument(skip_all)]
    fn delete_dataset_profiles(
        &self,
        org_id: &str,
        dataset_id: &str,
        request: &DeleteProfilesRequest,
    ) -> Result<Value, ClientError> {
        let route = Routes::DatasetProfiles {
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
        };
        let query_string = serde_qs::to_string(request)?;
        let body = self.request_json(route, RequestType::Delete, None, Some(query_string))?;
        Ok(if body.is_null() { json!({}) } else { body })
    }
}
