use thiserror::Error;
use whylabs_settings::ConfigError;
use whylabs_types::TracedError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeQsError(#[from] serde_qs::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("WhyLabs API returned {status}: {message}")]
    RemoteApi { status: u16, message: String },
}

impl TracedError for ClientError {}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn traced_remote_api_error(status: u16, message: impl Into<String>) -> Self {
        let error = Self::RemoteApi {
            status,
            message: message.into(),
        };
        error.trace();
        error
    }
}
