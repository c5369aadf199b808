use thiserror::Error;
use whylabs_http::error::ClientError;
use whylabs_settings::ConfigError;
use whylabs_types::{TracedError, TypeError};

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("{0}")]
    Validation(String),

    #[error("Monitor document failed schema validation: {0}")]
    SchemaValidation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("WhyLabs API error: {0}")]
    RemoteApi(ClientError),

    #[error("Monitor and analyzer are not set yet, call apply() first")]
    NotApplied,

    #[error("Unable to resolve granularity for dataset {0}")]
    Granularity(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TracedError for MonitorError {}

impl MonitorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn traced_validation_error(message: impl Into<String>) -> Self {
        let error = Self::Validation(message.into());
        error.trace();
        error
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MonitorError::NotFound(_))
    }
}

impl From<ClientError> for MonitorError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::NotFound(path) => MonitorError::NotFound(path),
            ClientError::ConfigError(error) => MonitorError::Configuration(error),
            other => MonitorError::RemoteApi(other),
        }
    }
}

impl From<TypeError> for MonitorError {
    fn from(error: TypeError) -> Self {
        match error {
            TypeError::SchemaValidationError(message) => MonitorError::SchemaValidation(message),
            TypeError::SerdeJsonError(error) => MonitorError::Serialization(error),
            TypeError::IoError(error) => MonitorError::Io(error),
            other => MonitorError::Validation(other.to_string()),
        }
    }
}
