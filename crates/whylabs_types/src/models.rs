use crate::commons::{Granularity, TimePeriod};
use serde::{Deserialize, Serialize};

/// Dataset (model) metadata as returned by the models API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    pub name: String,

    pub time_period: TimePeriod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
}

impl ModelMetadata {
    pub fn granularity(&self) -> Granularity {
        self.time_period.granularity()
    }
}
