//! HTTP client for the library REST API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::FetchError;
use crate::models::Resource;

/// Source of raw collection payloads, one call per resource.
#[async_trait]
pub trait ResourceSource: Send + Sync + fmt::Debug {
    /// Fetch the raw JSON payload for a resource.
    async fn fetch(&self, resource: Resource) -> Result<Value, FetchError>;
}

/// reqwest-backed client for the library API.
#[derive(Debug, Clone)]
pub struct LibraryApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl LibraryApiClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.library_api_url,
            config.library_api_token.clone(),
            config.library_api_timeout(),
        )
    }

    pub fn url_for(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }
}

#[async_trait]
impl ResourceSource for LibraryApiClient {
    async fn fetch(&self, resource: Resource) -> Result<Value, FetchError> {
        let url = self.url_for(resource);
        tracing::debug!(%resource, %url, "Fetching collection");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(resource.path(), &e))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode {
                resource: resource.path().to_string(),
                message: e.to_string(),
            })
    }
}
