use crate::error::ConfigError;
use serde::Serialize;
use whylabs_types::JsonFuncs;

pub const DEFAULT_HOST: &str = "https://api.whylabsapp.com";

pub const API_KEY_ENV: &str = "WHYLABS_API_KEY";
pub const HOST_ENV: &str = "WHYLABS_HOST";
pub const ORG_ID_ENVS: [&str; 2] = ["WHYLABS_DEFAULT_ORG_ID", "ORG_ID"];
pub const DATASET_ID_ENVS: [&str; 2] = ["WHYLABS_DEFAULT_DATASET_ID", "DATASET_ID"];

fn from_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
}

/// Connection settings and default identifiers.
///
/// Each value resolves from the explicit argument, then the environment,
/// then a default where one exists.
#[derive(Debug, Clone, Serialize)]
pub struct WhyLabsConfig {
    #[serde(skip_serializing)]
    api_key: Option<String>,

    pub host: String,

    org_id: Option<String>,

    dataset_id: Option<String>,
}

impl WhyLabsConfig {
    pub fn new(
        api_key: Option<String>,
        host: Option<String>,
        org_id: Option<String>,
        dataset_id: Option<String>,
    ) -> Self {
        let api_key = api_key.or_else(|| from_env(&[API_KEY_ENV]));
        let host = host
            .or_else(|| from_env(&[HOST_ENV]))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let org_id = org_id.or_else(|| from_env(&ORG_ID_ENVS));
        let dataset_id = dataset_id.or_else(|| from_env(&DATASET_ID_ENVS));

        WhyLabsConfig {
            api_key,
            host: host.trim_end_matches('/').to_string(),
            org_id,
            dataset_id,
        }
    }

    pub fn with_org_id(mut self, org_id: &str) -> Self {
        self.org_id = Some(org_id.to_string());
        self
    }

    pub fn with_dataset_id(mut self, dataset_id: &str) -> Self {
        self.dataset_id = Some(dataset_id.to_string());
        self
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn org_id(&self) -> Result<&str, ConfigError> {
        self.org_id.as_deref().ok_or(ConfigError::MissingOrgId)
    }

    pub fn dataset_id(&self) -> Result<&str, ConfigError> {
        self.dataset_id
            .as_deref()
            .ok_or(ConfigError::MissingDatasetId)
    }

    /// Resolves a dataset id, preferring the one passed by the caller
    pub fn resolve_dataset_id<'a>(
        &'a self,
        dataset_id: Option<&'a str>,
    ) -> Result<&'a str, ConfigError> {
        match dataset_id {
            Some(dataset_id) => Ok(dataset_id),
            None => self.dataset_id(),
        }
    }

    pub fn describe(&self) -> String {
        JsonFuncs::colored_str(self)
    }
}

impl Default for WhyLabsConfig {
    fn default() -> Self {
        WhyLabsConfig::new(None, None, None, None)
    }
}
