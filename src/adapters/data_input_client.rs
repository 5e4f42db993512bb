//! Client for the console backend endpoints that store new data inputs

use async_trait::async_trait;

use crate::config::BackendSettings;
use crate::domain::{DataInputConfig, IndexSavePort, KvStoreSavePort};

#[derive(Clone)]
pub struct DataInputApiClient {
    client: reqwest::Client,
    base_url: String,
    index_endpoint: String,
    kvstore_endpoint: String,
}

impl DataInputApiClient {
    pub fn new(settings: &BackendSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_client(client: reqwest::Client, settings: &BackendSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            index_endpoint: settings.index_endpoint.clone(),
            kvstore_endpoint: settings.kvstore_endpoint.clone(),
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}{}", self.base_url, self.index_endpoint)
    }

    pub fn kvstore_url(&self) -> String {
        format!("{}{}", self.base_url, self.kvstore_endpoint)
    }

    async fn post_config(&self, url: &str, config: &DataInputConfig) -> anyhow::Result<()> {
        let response = self.client.post(url).json(config).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("POST {} returned {}: {}", url, status.as_u16(), error_text);
        }

        tracing::debug!("POST {} -> {}", url, status.as_u16());
        Ok(())
    }
}

#[async_trait]
impl IndexSavePort for DataInputApiClient {
    async fn save_to_index(&self, config: &DataInputConfig) -> anyhow::Result<()> {
        self.post_config(&self.index_url(), config).await
    }
}

#[async_trait]
impl KvStoreSavePort for DataInputApiClient {
    async fn save_to_kvstore(&self, config: &DataInputConfig) -> anyhow::Result<()> {
        self.post_config(&self.kvstore_url(), config).await
    }
}
