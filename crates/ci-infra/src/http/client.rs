use std::time::Duration;

use anyhow::Context;
use ci_core::config::AppConfig;
use ci_core::ports::ApiError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{error_message, map_reqwest_error, map_status_code};

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL including the `/api` prefix, without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpClientConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            timeout: config.request_timeout(),
        }
    }
}

/// REST client for the intake endpoints.
pub struct HttpIntakeClient {
    pub(super) client: Client,
    base_url: String,
}

impl HttpIntakeClient {
    pub fn new(config: HttpClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(super) async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }
}

/// Turn a response into `R`, mapping non-2xx statuses to [`ApiError`].
pub(super) async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status_code(status, error_message(&body, status)));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}
