pub mod api;
pub mod error;

use crate::error::ClientError;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error};
use whylabs_settings::WhyLabsConfig;
use whylabs_types::http::{RequestType, Routes};

pub use api::WhyLabsApi;

const TIMEOUT_SECS: u64 = 60;
const API_KEY_HEADER: &str = "X-API-Key";

/// Create a new HTTP client that can be shared across different clients
pub fn build_http_client(settings: &WhyLabsConfig) -> Result<Client, ClientError> {
    let mut headers = HeaderMap::new();

    let mut api_key = HeaderValue::from_str(settings.api_key()?)?;
    api_key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, api_key);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client_builder = Client::builder().timeout(std::time::Duration::from_secs(TIMEOUT_SECS));
    let client = client_builder.default_headers(headers).build()?;
    Ok(client)
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_path: String,
}

impl HttpClient {
    pub fn new(config: &WhyLabsConfig) -> Result<Self, ClientError> {
        let client = build_http_client(config)?;

        let api_client = HttpClient {
            client,
            base_path: config.host.clone(),
        };

        debug!(
            "HttpClient initialized with base path: {}",
            api_client.base_path
        );
        Ok(api_client)
    }

    fn _request(
        &self,
        route: &Routes,
        request_type: RequestType,
        body_params: Option<Value>,
        query_string: Option<String>,
        headers: Option<HeaderMap>,
    ) -> Result<Response, ClientError> {
        let headers = headers.unwrap_or_default();

        let url = format!("{}/{}", self.base_path, route.as_path());
        let url = match query_string {
            Some(query_string) => format!("{url}?{query_string}"),
            None => url,
        };
        debug!("{:?} {}", request_type, url);

        let response = match request_type {
            RequestType::Get => self.client.get(url).headers(headers).send()?,
            RequestType::Post => self
                .client
                .post(url)
                .headers(headers)
                .json(&body_params)
                .send()?,
            RequestType::Put => self
                .client
                .put(url)
                .headers(headers)
                .json(&body_params)
                .send()?,
            RequestType::Patch => self
                .client
                .patch(url)
                .headers(headers)
                .json(&body_params)
                .send()?,
            RequestType::Delete => self.client.delete(url).headers(headers).send()?,
        };

        Ok(response)
    }

    /// Sends a request and maps non-success statuses to [`ClientError`]
    pub fn request(
        &self,
        route: Routes,
        request_type: RequestType,
        body_params: Option<Value>,
        query_params: Option<String>,
        headers: Option<HeaderMap>,
    ) -> Result<Response, ClientError> {
        let response = self._request(&route, request_type, body_params, query_params, headers)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            debug!("{} not found", route.as_path());
            return Err(ClientError::NotFound(route.as_path()));
        }

        error!(
            "Request to {} failed with status {}",
            route.as_path(),
            status
        );
        Err(ClientError::traced_remote_api_error(status.as_u16(), message))
    }

    /// Like [`HttpClient::request`], parsing the body as json.
    /// An empty body is returned as `Value::Null`.
    pub fn request_json(
        &self,
        route: Routes,
        request_type: RequestType,
        body_params: Option<Value>,
        query_params: Option<String>,
    ) -> Result<Value, ClientError> {
        let response = self.request(route, request_type, body_params, query_params, None)?;
        let body = response.text()?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
