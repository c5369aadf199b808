use crate::error::MonitorError;
use crate::helpers::DatasetClient;
use std::collections::{BTreeMap, HashSet};
use tracing::{instrument, warn};
use whylabs_types::{
    ColumnClassifier, ColumnDataType, ColumnDiscreteness, ColumnSchema, EntitySchema,
};

/// A change to the column schema of a dataset.
///
/// [`UpdateEntity::update`] validates the input, fetches the current schema,
/// applies [`UpdateEntity::update_columns`] and writes the schema back.
pub trait UpdateEntity {
    fn validate_input(&self) -> Result<(), MonitorError>;

    fn update_columns(&self, schema: &mut EntitySchema);

    #[instrument(skip_all)]
    fn update(&self, client: &DatasetClient) -> Result<EntitySchema, MonitorError> {
        self.validate_input()?;

        let mut schema = client
            .api()
            .get_entity_schema(&client.org_id, &client.dataset_id)?;
        self.update_columns(&mut schema);
        client
            .api()
            .put_entity_schema(&client.org_id, &client.dataset_id, &schema)?;
        Ok(schema)
    }
}

/// Rejects empty updates and columns listed on both sides
fn check_disjoint(
    kind: &str,
    (left_name, left): (&str, &[String]),
    (right_name, right): (&str, &[String]),
) -> Result<(), MonitorError> {
    if left.is_empty() && right.is_empty() {
        return Err(MonitorError::validation(format!(
            "{kind} update needs at least one {left_name} or {right_name} column"
        )));
    }

    let left_set: HashSet<&String> = left.iter().collect();
    let both: Vec<&String> = right
        .iter()
        .filter(|column| left_set.contains(column))
        .collect();
    if !both.is_empty() {
        return Err(MonitorError::validation(format!(
            "columns {both:?} cannot be both {left_name} and {right_name}"
        )));
    }
    Ok(())
}

fn for_known_column(
    schema: &mut EntitySchema,
    column: &str,
    update: impl FnOnce(&mut ColumnSchema),
) {
    match schema.columns.get_mut(column) {
        Some(column_schema) => update(column_schema),
        None => warn!("Column {} is not part of the entity schema, skipping", column),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateColumnClassifiers {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl UpdateEntity for UpdateColumnClassifiers {
    fn validate_input(&self) -> Result<(), MonitorError> {
        check_disjoint(
            "classifier",
            ("input", self.inputs.as_slice()),
            ("output", self.outputs.as_slice()),
        )
    }

    fn update_columns(&self, schema: &mut EntitySchema) {
        for column in &self.inputs {
            for_known_column(schema, column, |c| c.classifier = Some(ColumnClassifier::Input));
        }
        for column in &self.outputs {
            for_known_column(schema, column, |c| c.classifier = Some(ColumnClassifier::Output));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEntityDataTypes {
    pub columns: BTreeMap<String, ColumnDataType>,
}

impl UpdateEntity for UpdateEntityDataTypes {
    fn validate_input(&self) -> Result<(), MonitorError> {
        if self.columns.is_empty() {
            return Err(MonitorError::validation(
                "data type update needs at least one column",
            ));
        }
        Ok(())
    }

    fn update_columns(&self, schema: &mut EntitySchema) {
        for (column, data_type) in &self.columns {
            for_known_column(schema, column, |c| c.data_type = *data_type);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateColumnsDiscreteness {
    pub discrete: Vec<String>,
    pub continuous: Vec<String>,
}

impl UpdateEntity for UpdateColumnsDiscreteness {
    fn validate_input(&self) -> Result<(), MonitorError> {
        check_disjoint(
            "discreteness",
            ("discrete", self.discrete.as_slice()),
            ("continuous", self.continuous.as_slice()),
        )
    }

    fn update_columns(&self, schema: &mut EntitySchema) {
        for column in &self.discrete {
            for_known_column(schema, column, |c| {
                c.discreteness = ColumnDiscreteness::Discrete
            });
        }
        for column in &self.continuous {
            for_known_column(schema, column, |c| {
                c.discreteness = ColumnDiscreteness::Continuous
            });
        }
    }
}
