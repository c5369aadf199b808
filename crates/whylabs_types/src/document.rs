use crate::analyzer::Analyzer;
use crate::column_schema::EntitySchema;
use crate::commons::{Granularity, Metadata};
use crate::error::TypeError;
use crate::monitor::Monitor;
use crate::util::{check_length, check_max_items};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The monitor configuration document of a dataset, managed by WhyLabs
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default = "default_schema_version")]
    pub schema_version: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    pub org_id: String,

    pub dataset_id: String,

    pub granularity: Granularity,

    /// Analyze a target batch as soon as its data is present instead of
    /// waiting for the batch to conclude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_partial_target_batches: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_schema: Option<EntitySchema>,

    pub analyzers: Vec<Analyzer>,

    pub monitors: Vec<Monitor>,
}

fn default_schema_version() -> u8 {
    1
}

impl Document {
    pub fn new(org_id: &str, dataset_id: &str, granularity: Granularity) -> Self {
        Document {
            id: None,
            schema_version: default_schema_version(),
            metadata: None,
            org_id: org_id.to_string(),
            dataset_id: dataset_id.to_string(),
            granularity,
            allow_partial_target_batches: None,
            entity_schema: None,
            analyzers: vec![],
            monitors: vec![],
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if self.schema_version != 1 {
            return Err(TypeError::invalid_field(
                "schemaVersion",
                format!("unsupported schema version {}", self.schema_version),
            ));
        }
        check_length("orgId", &self.org_id, 1, 100)?;
        check_length("datasetId", &self.dataset_id, 1, 100)?;
        check_max_items("analyzers", &self.analyzers, 1000)?;
        check_max_items("monitors", &self.monitors, 1000)?;

        self.analyzers.iter().try_for_each(Analyzer::validate)?;
        self.monitors.iter().try_for_each(Monitor::validate)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, TypeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
