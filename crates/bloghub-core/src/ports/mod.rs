//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod repository;
mod storage;

pub use repository::{BaseRepository, CategoryRepository, PostRepository};
pub use storage::{ImageStore, StorageError};
