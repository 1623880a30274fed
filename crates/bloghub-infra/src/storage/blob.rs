//! HTTP blob store for featured images.

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;

use bloghub_core::domain::{ImageUpload, StoredImage};
use bloghub_core::ports::{ImageStore, StorageError};

#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    pub base_url: String,
    pub token: String,
}

/// Uploads with `PUT <base_url>/<filename>` and a bearer token.
pub struct BlobImageStore {
    config: BlobStoreConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
    pathname: String,
}

impl BlobImageStore {
    pub fn new(config: BlobStoreConfig) -> Result<Self, StorageError> {
        if config.token.is_empty() {
            return Err(StorageError::NotConfigured(
                "BLOB_READ_WRITE_TOKEN is empty".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| StorageError::NotConfigured(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn object_url(&self, filename: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), filename)
    }
}

#[async_trait]
impl ImageStore for BlobImageStore {
    async fn put(&self, image: ImageUpload) -> Result<StoredImage, StorageError> {
        let size = image.size();
        let response = self
            .client
            .put(self.object_url(&image.filename))
            .bearer_auth(&self.config.token)
            .header(header::CONTENT_TYPE, &image.content_type)
            .body(image.bytes)
            .send()
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "Blob store rejected upload");
            return Err(StorageError::Remote(format!("status {status}")));
        }

        let body: PutResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;

        tracing::debug!(url = %body.url, pathname = %body.pathname, "Image uploaded");

        Ok(StoredImage {
            url: body.url,
            filename: body.pathname,
            size,
            content_type: image.content_type,
        })
    }
}
