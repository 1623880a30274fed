//! Featured image storage backends.

mod local;

#[cfg(feature = "blob")]
mod blob;

pub use local::{LocalImageStore, LocalStoreConfig};

#[cfg(feature = "blob")]
pub use blob::{BlobImageStore, BlobStoreConfig};
