use std::fmt::Display;
use thiserror::Error;
use tracing::error;

pub trait TracedError: Display {
    fn trace(&self) {
        error!("{}", self);
    }
}

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Start time {start} must be before end time {end}")]
    StartTimeError { start: String, end: String },

    #[error("Failed to parse {kind} from '{value}'")]
    ParseError { kind: String, value: String },

    #[error("Failed to compile bundled JSON schema: {0}")]
    SchemaCompileError(String),

    #[error("Document failed JSON schema validation: {0}")]
    SchemaValidationError(String),

    #[error("Failed to get parent path")]
    GetParentPathError,

    #[error("Failed to create directory")]
    CreateDirectoryError,

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl TracedError for TypeError {}

impl TypeError {
    pub fn invalid_field(field: &str, reason: impl Display) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn traced_schema_compile_error(err: impl Display) -> Self {
        let error = Self::SchemaCompileError(err.to_string());
        error.trace();
        error
    }

    pub fn traced_schema_validation_error(err: impl Display) -> Self {
        let error = Self::SchemaValidationError(err.to_string());
        error.trace();
        error
    }

    pub fn parse_error(kind: &str, value: &str) -> Self {
        Self::ParseError {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }
}
