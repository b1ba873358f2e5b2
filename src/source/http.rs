use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::DatasetSource;

/// Downloads the dataset with a single GET request.
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn read_bytes(&self) -> Result<Vec<u8>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch dataset from {}: {}", self.url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow!("Dataset download from {} failed with status {}", self.url, status));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}
