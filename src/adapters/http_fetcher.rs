//! reqwest-backed preview fetcher

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use crate::domain::{PreviewFetchPort, PreviewResponse};

/// Fetches preview documents from user-supplied URLs
#[derive(Clone, Default)]
pub struct HttpPreviewFetcher {
    client: reqwest::Client,
}

impl HttpPreviewFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PreviewFetchPort for HttpPreviewFetcher {
    async fn get(&self, url: &str) -> anyhow::Result<PreviewResponse> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(PreviewResponse { status, body })
    }
}
