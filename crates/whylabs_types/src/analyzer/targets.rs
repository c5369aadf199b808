use crate::error::TypeError;
use crate::segments::Segment;
use crate::util::{check_length, check_max_items};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Standard column groupings accepted anywhere a column name is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
pub enum ColumnGroup {
    #[strum(serialize = "group:continuous")]
    Continuous,
    #[strum(serialize = "group:discrete")]
    Discrete,
    #[strum(serialize = "group:input")]
    Input,
    #[strum(serialize = "group:output")]
    Output,
    #[strum(serialize = "group:bool")]
    Bool,
    #[strum(serialize = "group:int")]
    Int,
    #[strum(serialize = "group:frac")]
    Frac,
    #[strum(serialize = "group:str")]
    Str,
}

impl ColumnGroup {
    pub fn is_group(column: &str) -> bool {
        ColumnGroup::from_str(column).is_ok()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMatrix {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// Evaluated after `include`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

impl ColumnMatrix {
    pub fn new(include: Vec<String>, exclude: Vec<String>, segments: Vec<Segment>) -> Self {
        ColumnMatrix {
            include: Some(include),
            exclude: Some(exclude),
            segments: Some(segments),
            profile_id: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DatasetMatrix {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TargetMatrix {
    Column(ColumnMatrix),
    Dataset(DatasetMatrix),
}

impl TargetMatrix {
    pub fn is_column(&self) -> bool {
        matches!(self, TargetMatrix::Column(_))
    }

    pub fn is_dataset(&self) -> bool {
        matches!(self, TargetMatrix::Dataset(_))
    }

    pub fn segments(&self) -> Option<&Vec<Segment>> {
        match self {
            TargetMatrix::Column(matrix) => matrix.segments.as_ref(),
            TargetMatrix::Dataset(matrix) => matrix.segments.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        let segments = match self {
            TargetMatrix::Column(matrix) => {
                for (field, columns) in [("include", &matrix.include), ("exclude", &matrix.exclude)]
                {
                    if let Some(columns) = columns {
                        check_max_items(&format!("targetMatrix.{field}"), columns, 1000)?;
                        for column in columns {
                            check_length(&format!("targetMatrix.{field}"), column, 1, 1000)?;
                        }
                    }
                }
                if let Some(profile_id) = &matrix.profile_id {
                    check_length("targetMatrix.profileId", profile_id, 1, 100)?;
                }
                &matrix.segments
            }
            TargetMatrix::Dataset(matrix) => &matrix.segments,
        };

        if let Some(segments) = segments {
            check_max_items("targetMatrix.segments", segments, 1000)?;
            segments.iter().try_for_each(Segment::validate)?;
        }
        Ok(())
    }
}

impl From<ColumnMatrix> for TargetMatrix {
    fn from(matrix: ColumnMatrix) -> Self {
        TargetMatrix::Column(matrix)
    }
}

impl From<DatasetMatrix> for TargetMatrix {
    fn from(matrix: DatasetMatrix) -> Self {
        TargetMatrix::Dataset(matrix)
    }
}
