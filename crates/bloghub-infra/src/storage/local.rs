//! Local disk image store - used when no blob store is configured.

use std::path::PathBuf;

use async_trait::async_trait;

use bloghub_core::domain::{ImageUpload, StoredImage};
use bloghub_core::ports::{ImageStore, StorageError};

#[derive(Debug, Clone)]
pub struct LocalStoreConfig {
    /// Directory the files are written to.
    pub dir: PathBuf,
    /// URL prefix the directory is served under.
    pub public_path: String,
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public/uploads"),
            public_path: "/uploads".to_string(),
        }
    }
}

pub struct LocalImageStore {
    config: LocalStoreConfig,
}

impl LocalImageStore {
    pub fn new(config: LocalStoreConfig) -> Self {
        Self { config }
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.config.public_path.trim_end_matches('/'), filename)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, image: ImageUpload) -> Result<StoredImage, StorageError> {
        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let path = self.config.dir.join(&image.filename);
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(path = %path.display(), size = image.size(), "Image written");

        Ok(StoredImage {
            url: self.public_url(&image.filename),
            size: image.size(),
            filename: image.filename,
            content_type: image.content_type,
        })
    }
}
