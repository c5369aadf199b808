use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum RequestType {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Routes {
    MonitorConfig {
        org_id: String,
        dataset_id: String,
    },
    Monitor {
        org_id: String,
        dataset_id: String,
        monitor_id: String,
    },
    Analyzer {
        org_id: String,
        dataset_id: String,
        analyzer_id: String,
    },
    EntitySchema {
        org_id: String,
        dataset_id: String,
    },
    Model {
        org_id: String,
        dataset_id: String,
    },
    NotificationActions {
        org_id: String,
    },
    NotificationAction {
        org_id: String,
        action_type: String,
        action_id: String,
    },
    DatasetProfiles {
        org_id: String,
        dataset_id: String,
    },
}

impl Routes {
    pub fn as_path(&self) -> String {
        match self {
            Routes::MonitorConfig { org_id, dataset_id } => {
                format!("v0/organizations/{org_id}/monitor-config/v3/{dataset_id}")
            }
            Routes::Monitor {
                org_id,
                dataset_id,
                monitor_id,
            } => format!(
                "v0/organizations/{org_id}/monitor-config/v3/{dataset_id}/monitor/{monitor_id}"
            ),
            Routes::Analyzer {
                org_id,
                dataset_id,
                analyzer_id,
            } => format!(
                "v0/organizations/{org_id}/monitor-config/v3/{dataset_id}/analyzer/{analyzer_id}"
            ),
            Routes::EntitySchema { org_id, dataset_id } => {
                format!("v0/organizations/{org_id}/dataset/{dataset_id}/schema")
            }
            Routes::Model { org_id, dataset_id } => {
                format!("v0/organizations/{org_id}/models/{dataset_id}")
            }
            Routes::NotificationActions { org_id } => {
                format!("v1/organizations/{org_id}/notification-settings/actions")
            }
            Routes::NotificationAction {
                org_id,
                action_type,
                action_id,
            } => format!(
                "v1/organizations/{org_id}/notification-settings/actions/{action_type}/{action_id}"
            ),
            Routes::DatasetProfiles { org_id, dataset_id } => {
                format!("v0/organizations/{org_id}/dataset-profiles/models/{dataset_id}")
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpdateModelRequest {
    pub model_name: String,
    pub time_period: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
}

/// Epoch millis, inclusive start and exclusive end
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeleteProfilesRequest {
    pub profile_start_timestamp: i64,
    pub profile_end_timestamp: i64,
}
