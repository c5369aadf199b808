use crate::error::TypeError;
use serde_json::Value;
use tracing::debug;

/// Draft-07 JSON schema for a monitor configuration document
pub const DOCUMENT_SCHEMA: &str = include_str!("../schema/schema.json");

/// Validates a serialized document against the bundled schema.
/// All violations are collected into a single error.
pub fn validate_document(document: &Value) -> Result<(), TypeError> {
    let schema: Value = serde_json::from_str(DOCUMENT_SCHEMA)?;
    let validator =
        jsonschema::validator_for(&schema).map_err(TypeError::traced_schema_compile_error)?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|error| format!("{} at '{}'", error, error.instance_path))
        .collect();

    if errors.is_empty() {
        debug!("Document passed schema validation");
        return Ok(());
    }

    Err(TypeError::traced_schema_validation_error(errors.join("; ")))
}
