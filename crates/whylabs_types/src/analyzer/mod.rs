pub mod algorithms;
pub mod baseline;
pub mod metrics;
pub mod targets;

use crate::commons::{Metadata, Schedule};
use crate::error::TypeError;
use crate::util::{check_display_name, check_identifier, check_tags, is_iso8601_duration};
use serde::{Deserialize, Serialize};

pub use algorithms::*;
pub use baseline::*;
pub use metrics::*;
pub use targets::*;

/// An analysis of one metric against one baseline, fanned out over a target matrix.
/// Its output is the list of anomalies monitors notify on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analyzer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// When unset the analyzer is considered disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_target_rollup: Option<bool>,

    pub target_matrix: TargetMatrix,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_readiness_duration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_cool_down_period: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill_grace_period_duration: Option<String>,

    pub config: AlgorithmConfig,
}

impl Analyzer {
    pub fn new(id: &str, target_matrix: TargetMatrix, config: AlgorithmConfig) -> Self {
        Analyzer {
            metadata: None,
            id: id.to_string(),
            display_name: None,
            tags: None,
            schedule: None,
            disabled: None,
            disable_target_rollup: None,
            target_matrix,
            data_readiness_duration: None,
            batch_cool_down_period: None,
            backfill_grace_period_duration: None,
            config,
        }
    }

    /// Structural checks the platform applies on save
    pub fn validate(&self) -> Result<(), TypeError> {
        check_identifier("analyzer.id", &self.id)?;

        if let Some(display_name) = &self.display_name {
            check_display_name("analyzer.displayName", display_name)?;
        }

        if let Some(tags) = &self.tags {
            check_tags("analyzer.tags", tags)?;
        }

        if let Some(schedule) = &self.schedule {
            if !schedule.is_fixed() {
                return Err(TypeError::invalid_field(
                    "analyzer.schedule",
                    "analyzers only support a fixed cadence schedule",
                ));
            }
        }

        for (field, duration) in [
            ("analyzer.dataReadinessDuration", &self.data_readiness_duration),
            ("analyzer.batchCoolDownPeriod", &self.batch_cool_down_period),
            (
                "analyzer.backfillGracePeriodDuration",
                &self.backfill_grace_period_duration,
            ),
        ] {
            if let Some(duration) = duration {
                if !is_iso8601_duration(duration) {
                    return Err(TypeError::invalid_field(
                        field,
                        format!("'{duration}' is not an ISO 8601 duration"),
                    ));
                }
            }
        }

        self.target_matrix.validate()?;
        self.config.validate()?;

        if !self.config.is_composed() {
            let metric = self.config.metric();
            if (metric.is_dataset_metric() || metric.is_ingestion_metric())
                && self.target_matrix.is_column()
            {
                return Err(TypeError::invalid_field(
                    "analyzer.targetMatrix",
                    format!("dataset level metric {metric} requires a dataset target matrix"),
                ));
            }
        }

        Ok(())
    }
}
