use crate::commons::Metadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDataType {
    Integral,
    Fractional,
    Bool,
    String,
    Unknown,
    Null,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDiscreteness {
    Discrete,
    Continuous,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnClassifier {
    Input,
    Output,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ColumnClassifier>,

    #[serde(alias = "data_type")]
    pub data_type: ColumnDataType,

    pub discreteness: ColumnDiscreteness,
}

/// Column level schema of a dataset, keyed by column name
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EntitySchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(default)]
    pub columns: BTreeMap<String, ColumnSchema>,
}

impl EntitySchema {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }
}
