pub mod actions;

use crate::commons::{Metadata, Schedule};
use crate::error::TypeError;
use crate::util::{check_display_name, check_identifier, check_max_items, check_tags};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub use actions::*;

/// Filters anomalies before a monitor fires. Filtering down to zero anomalies silences it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_columns: Option<Vec<String>>,

    /// Applied after `includeColumns`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_columns: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_weight: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rank_by_weight: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rank_by_weight: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_total_weight: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_weight: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_alert_count: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_alert_count: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_metrics: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_metrics: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EveryAnomalyMode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<AnomalyFilter>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestModeGrouping {
    #[serde(rename = "byColumn")]
    ByColumn,
    #[serde(rename = "byDataset")]
    ByDataset,
    #[serde(rename = "byAnalyzer")]
    ByAnalyzer,
    #[serde(rename = "byDay")]
    ByDay,
    #[serde(rename = "byHour")]
    ByHour,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DigestMode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<AnomalyFilter>,

    /// ISO 8601 offset, required for scheduled digests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time_offset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_timestamp_offset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<DigestModeGrouping>>,
}

/// Whether a monitor sends one digest or one message per anomaly
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum MonitorMode {
    #[serde(rename = "EVERY_ANOMALY")]
    EveryAnomaly(EveryAnomalyMode),
    #[serde(rename = "DIGEST")]
    Digest(DigestMode),
}

impl Default for MonitorMode {
    fn default() -> Self {
        MonitorMode::Digest(DigestMode::default())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Plural for historical reasons, a single analyzer is supported
    pub analyzer_ids: Vec<String>,

    pub schedule: Schedule,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    #[serde(default = "default_severity", skip_serializing_if = "Option::is_none")]
    pub severity: Option<i64>,

    pub mode: MonitorMode,

    pub actions: Vec<MonitorAction>,
}

fn default_severity() -> Option<i64> {
    Some(3)
}

fn analyzer_id_regex() -> &'static Regex {
    static ANALYZER_ID: OnceLock<Regex> = OnceLock::new();
    ANALYZER_ID
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("analyzer id regex is valid"))
}

impl Monitor {
    pub fn new(id: &str, analyzer_ids: Vec<String>, mode: MonitorMode) -> Self {
        Monitor {
            metadata: None,
            id: id.to_string(),
            display_name: None,
            tags: None,
            analyzer_ids,
            schedule: Schedule::Immediate,
            disabled: None,
            severity: default_severity(),
            mode,
            actions: vec![],
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        check_identifier("monitor.id", &self.id)?;

        if let Some(display_name) = &self.display_name {
            check_display_name("monitor.displayName", display_name)?;
        }

        if let Some(tags) = &self.tags {
            check_tags("monitor.tags", tags)?;
        }

        check_max_items("monitor.analyzerIds", &self.analyzer_ids, 100)?;
        for analyzer_id in &self.analyzer_ids {
            if !analyzer_id_regex().is_match(analyzer_id) {
                return Err(TypeError::invalid_field(
                    "monitor.analyzerIds",
                    format!("'{analyzer_id}' may only contain alphanumerics, dashes and underscores"),
                ));
            }
        }

        check_max_items("monitor.actions", &self.actions, 100)?;
        self.actions.iter().try_for_each(MonitorAction::validate)?;

        if let MonitorMode::Digest(digest) = &self.mode {
            if let Some(group_by) = &digest.group_by {
                check_max_items("monitor.mode.groupBy", group_by, 10)?;
            }
        }

        Ok(())
    }
}
