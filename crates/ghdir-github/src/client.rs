use std::time::Duration;

use ghdir::{ChunkStream, Entry, FetchError, Remote};
use reqwest::header::ACCEPT;

use crate::contents::{ErrorResponse, parse_listing};

const GITHUB_JSON: &str = "application/vnd.github+json";

/// HTTP settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Bound on a whole request, body included.
    pub timeout: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "ghdir".into(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Unauthenticated GitHub transport: Contents API listings and raw downloads.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: &GitHubClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_owned()
                } else {
                    trimmed.to_owned()
                }
            });

        Err(FetchError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl Remote for GitHubClient {
    async fn list(&self, listing_url: &str) -> Result<Vec<Entry>, FetchError> {
        tracing::debug!(url = listing_url, "GET listing");

        let response = self
            .send(self.client.get(listing_url).header(ACCEPT, GITHUB_JSON))
            .await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read listing body: {e}")))?;

        parse_listing(&body)
    }

    async fn open(&self, download_url: &str) -> Result<Box<dyn ChunkStream>, FetchError> {
        tracing::debug!(url = download_url, "GET raw content");

        let response = self.send(self.client.get(download_url)).await?;
        Ok(Box::new(ResponseBody(response)))
    }
}

struct ResponseBody(reqwest::Response);

#[async_trait::async_trait]
impl ChunkStream for ResponseBody {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        self.0
            .chunk()
            .await
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .map_err(|e| FetchError::Network(format!("failed to read body: {e}")))
    }
}
