use crate::commons::TimeRange;
use crate::error::TypeError;
use crate::util::check_length;
use serde::{Deserialize, Serialize};

/// A dynamic trailing window, the default baseline for most monitors
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrailingWindowBaseline {
    pub size: u32,

    /// Offset from the current batch. Defaults to 1 (the previous batch) server side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_ranges: Option<Vec<TimeRange>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit_segment: Option<bool>,
}

impl TrailingWindowBaseline {
    pub fn new(size: u32) -> Self {
        TrailingWindowBaseline {
            size,
            offset: None,
            exclusion_ranges: None,
            dataset_id: None,
            inherit_segment: None,
        }
    }
}

/// A static reference profile, e.g. a training set uploaded to WhyLabs
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceProfileId {
    pub profile_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeBaseline {
    pub range: TimeRange,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit_segment: Option<bool>,
}

impl TimeRangeBaseline {
    pub fn new(range: TimeRange) -> Self {
        TimeRangeBaseline {
            range,
            dataset_id: None,
            inherit_segment: None,
        }
    }
}

/// Uses a batch of another entity as the baseline, so `datasetId` is required
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SingleBatchBaseline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    pub dataset_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit_segment: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Baseline {
    TrailingWindow(TrailingWindowBaseline),
    Reference(ReferenceProfileId),
    TimeRange(TimeRangeBaseline),
    CurrentBatch(SingleBatchBaseline),
}

impl Baseline {
    pub fn trailing_window(size: u32) -> Self {
        Baseline::TrailingWindow(TrailingWindowBaseline::new(size))
    }

    pub fn time_range(range: TimeRange) -> Self {
        Baseline::TimeRange(TimeRangeBaseline::new(range))
    }

    pub fn reference(profile_id: &str) -> Self {
        Baseline::Reference(ReferenceProfileId {
            profile_id: profile_id.to_string(),
            dataset_id: None,
        })
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        match self {
            Baseline::TrailingWindow(window) => {
                if window.size <= 3 || window.size > 90 {
                    return Err(TypeError::invalid_field(
                        "baseline.size",
                        format!("trailing window size {} must be in 4..=90", window.size),
                    ));
                }
                if let Some(ranges) = &window.exclusion_ranges {
                    crate::util::check_max_items("baseline.exclusionRanges", ranges, 100)?;
                }
                Ok(())
            }
            Baseline::Reference(reference) => {
                check_length("baseline.profileId", &reference.profile_id, 1, 100)
            }
            Baseline::TimeRange(time_range) => {
                if time_range.range.start >= time_range.range.end {
                    return Err(TypeError::StartTimeError {
                        start: time_range.range.start.to_rfc3339(),
                        end: time_range.range.end.to_rfc3339(),
                    });
                }
                Ok(())
            }
            Baseline::CurrentBatch(batch) => {
                check_length("baseline.datasetId", &batch.dataset_id, 1, 100)
            }
        }
    }
}
