//! REST backend HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderValue, PRAGMA};
use reqwest::{Client, StatusCode, Url, cookie::Jar};
use serde::Deserialize;
use serde_json::Value;

use super::ResourceApi;
use crate::error::{AppError, Result};

/// Response envelope used by every endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend API client.
///
/// Keeps a cookie jar so session cookies set by the API are sent back on
/// every request. No timeout is configured; a request ends when the server
/// or the transport gives up.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. "http://localhost:3000").
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| AppError::config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!("API base URL '{base_url}' cannot be a base")));
        }

        let jar = Arc::new(Jar::default());
        let client = Client::builder().cookie_provider(jar).build()?;

        Ok(Self { client, base_url })
    }

    /// Underlying HTTP client (shares the cookie jar).
    pub fn http(&self) -> Client {
        self.client.clone()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build `{base}/{path}` or `{base}/{path}/{id}`.
    pub fn endpoint(&self, path: &str, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Check that the department collection answers successfully.
    pub async fn test_connection(&self) -> Result<()> {
        self.list("department").await.map(|_| ())
    }

    async fn finish(response: reqwest::Response) -> Result<Envelope> {
        let status = response.status();
        let body = response.text().await?;
        interpret(status, &body)
    }
}

/// Turn a status and body into an envelope or an error.
///
/// Non-OK responses carry the server's `message` when the body is JSON with
/// one; anything else leaves the message empty so the generic text is shown.
pub(crate) fn interpret(status: StatusCode, body: &str) -> Result<Envelope> {
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Envelope::default());
        }
        return serde_json::from_str(body).map_err(|e| AppError::decode(format!("response body: {e}")));
    }

    let message = serde_json::from_str::<Envelope>(body).ok().and_then(|e| e.message);
    Err(AppError::Api { status, message })
}

#[async_trait]
impl ResourceApi for ApiClient {
    async fn list(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path, None);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .header(PRAGMA, HeaderValue::from_static("no-cache"))
            .send()
            .await?;

        Self::finish(response)
            .await?
            .data
            .ok_or_else(|| AppError::decode(format!("{path}: response has no data")))
    }

    async fn create(&self, path: &str, body: Value) -> Result<Option<String>> {
        let url = self.endpoint(path, None);
        tracing::debug!("POST {}", url);

        let response = self.client.post(url).json(&body).send().await?;
        Ok(Self::finish(response).await?.message)
    }

    async fn update(&self, path: &str, id: &str, body: Value) -> Result<Option<String>> {
        let url = self.endpoint(path, Some(id));
        tracing::debug!("PATCH {}", url);

        let response = self.client.patch(url).json(&body).send().await?;
        Ok(Self::finish(response).await?.message)
    }

    async fn delete(&self, path: &str, id: &str) -> Result<Option<String>> {
        let url = self.endpoint(path, Some(id));
        tracing::debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        Ok(Self::finish(response).await?.message)
    }
}
