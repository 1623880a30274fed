use async_trait::async_trait;

use crate::domain::{ImageUpload, StoredImage};

/// Object storage for featured images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image and return where it can be fetched from.
    async fn put(&self, image: ImageUpload) -> Result<StoredImage, StorageError>;
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O failed: {0}")]
    Io(String),

    #[error("Remote store rejected the upload: {0}")]
    Remote(String),

    #[error("Storage not configured: {0}")]
    NotConfigured(String),
}
