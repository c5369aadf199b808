use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing WHYLABS_API_KEY. Pass an api key or set the environment variable")]
    MissingApiKey,

    #[error("Missing org id. Pass one explicitly or set WHYLABS_DEFAULT_ORG_ID or ORG_ID")]
    MissingOrgId,

    #[error(
        "Missing dataset id. Pass one explicitly or set WHYLABS_DEFAULT_DATASET_ID or DATASET_ID"
    )]
    MissingDatasetId,

    #[error("Failed to set log level: {0}")]
    SetLogLevelError(String),
}
