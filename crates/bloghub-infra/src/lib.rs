//! # BlogHub Infrastructure
//!
//! Concrete implementations of the ports defined in `bloghub-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory repositories and local disk
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `blob` - HTTP blob storage for featured images

pub mod database;
pub mod memory;
pub mod storage;

// Re-exports - always available
pub use database::{DatabaseConfig, DatabaseConnections};
pub use memory::InMemoryRepository;
pub use storage::{LocalImageStore, LocalStoreConfig};

#[cfg(feature = "postgres")]
pub use database::{PostgresCategoryRepository, PostgresPostRepository};

#[cfg(feature = "blob")]
pub use storage::{BlobImageStore, BlobStoreConfig};
