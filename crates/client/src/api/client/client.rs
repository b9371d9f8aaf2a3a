use std::sync::Arc;

use common::prelude::{authorize, ApiKey, CapabilitySet};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;
use crate::config::ClientConfig;

/// Stateless client for the storage API.
///
/// The API key is decoded once, here, and shared read-only by every clone.
/// Each [`call`](Self::call) is an independent request: nothing is queued,
/// retried or cached, and concurrent calls carry no ordering guarantee.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    key: Arc<ApiKey>,
    client: Client,
}

impl ApiClient {
    pub fn new(api_key: &str, config: &ClientConfig) -> Result<Self, ApiError> {
        let key = ApiKey::parse(api_key)?;
        let remote = config.base_url()?;
        Self::with_key(key, &remote)
    }

    pub fn with_key(key: ApiKey, remote: &Url) -> Result<Self, ApiError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key.as_str()))?;
        bearer.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, bearer);
        let client = Client::builder().default_headers(default_headers).build()?;

        tracing::debug!(remote = %remote, scope = %key.scope(), "api client ready");

        Ok(Self {
            remote: remote.clone(),
            key: Arc::new(key),
            client,
        })
    }

    /// Gate, send and decode a single request.
    ///
    /// A denied operation returns [`ApiError::AuthorizationDenied`] without
    /// touching the network. Transport failures and non-2xx responses are
    /// returned as they are; nothing is retried.
    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let operation = request.operation();
        if let Err(denied) = authorize(self.key.scope(), operation) {
            tracing::debug!(%operation, scope = %self.key.scope(), "refusing request locally");
            return Err(denied.into());
        }

        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;
        let status = response.status();
        tracing::debug!(%operation, %status, "api response");

        if status.is_success() {
            if T::DISCARDS_BODY {
                return Ok(serde_json::from_value(serde_json::Value::Null)?);
            }
            let bytes = response.bytes().await?;
            let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            Ok(serde_json::from_slice(body)?)
        } else {
            Err(ApiError::HttpStatus(status, response.text().await?))
        }
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.key
    }

    pub fn scope(&self) -> CapabilitySet {
        self.key.scope()
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
