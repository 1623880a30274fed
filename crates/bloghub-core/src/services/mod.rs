//! Application services - validation, slug identity and uniqueness rules on
//! top of the repository ports.

mod category;
mod post;
mod seed;

pub use category::CategoryService;
pub use post::PostService;
pub use seed::{SeedReport, seed_sample_data};
