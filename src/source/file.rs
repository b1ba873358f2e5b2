use anyhow::{Context, Result};
use async_trait::async_trait;

use super::DatasetSource;

pub struct FileSource {
    path: String,
}

impl FileSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn read_bytes(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read dataset file '{}'", self.path))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path)
    }
}
