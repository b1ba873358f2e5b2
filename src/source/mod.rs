//! Where the dataset bytes come from: a local file or an HTTP(S) URL.

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::dataset::Dataset;

/// Something that can hand over the raw (possibly gzipped) CSV payload.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn read_bytes(&self) -> Result<Vec<u8>>;

    /// Human-readable location, used in logs and error messages.
    fn describe(&self) -> String;
}

/// Picks an [`HttpSource`] for `http://`/`https://` locations and a [`FileSource`] otherwise.
pub fn source_for(location: &str) -> Box<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Reads and decodes the whole table from `source`.
#[tracing::instrument(skip(source), fields(source = %source.describe()))]
pub async fn load_dataset(source: &dyn DatasetSource) -> Result<Dataset> {
    let bytes = source.read_bytes().await?;
    debug!(bytes = bytes.len(), "Dataset bytes received, parsing");

    Dataset::from_bytes(&bytes)
        .with_context(|| format!("failed to parse dataset from {}", source.describe()))
}
