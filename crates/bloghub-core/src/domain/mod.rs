//! Domain entities - the core business objects.

mod category;
mod post;
mod upload;

pub use category::{Category, CategoryChanges, NewCategory};
pub use post::{CategorySummary, NewPost, Post, PostChanges, PostWithCategories};
pub use upload::{ALLOWED_IMAGE_TYPES, ImageUpload, MAX_IMAGE_SIZE, StoredImage};
