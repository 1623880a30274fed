//! # BlogHub Core
//!
//! The domain layer of BlogHub.
//! Posts, categories, slug identity and the services that enforce their
//! invariants. Storage is reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;
pub mod slug;

pub use error::{DomainError, RepoError};
pub use services::{CategoryService, PostService, SeedReport, seed_sample_data};
