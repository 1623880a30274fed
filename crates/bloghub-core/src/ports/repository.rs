use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post, PostWithCategories};
use crate::error::RepoError;
use crate::query::{PostCategoryRow, PostPredicate};

/// Generic repository trait defining the operations every table shares.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Fails with `RepoError::NotFound` when no
    /// row was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Category repository.
///
/// Deleting a category also removes its `post_categories` rows.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories, newest first.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn insert(&self, category: Category) -> Result<Category, RepoError>;

    async fn update(&self, category: Category) -> Result<Category, RepoError>;
}

/// Post repository.
///
/// Writes that touch both `posts` and `post_categories` are atomic: either
/// every row is written or none is.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    /// The post with this slug and its categories.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError>;

    /// IDs of every post linked to `category_id`.
    async fn post_ids_in_category(&self, category_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// One page of post IDs matching `predicate`, newest first.
    async fn page_ids(
        &self,
        predicate: &PostPredicate,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Uuid>, RepoError>;

    /// Left-join rows for exactly these posts, in the order of `ids`.
    async fn rows_for(&self, ids: &[Uuid]) -> Result<Vec<PostCategoryRow>, RepoError>;

    /// Insert `post` and one link per category.
    async fn insert_with_categories(
        &self,
        post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError>;

    /// Overwrite `post`. When `category_ids` is `Some` the existing links are
    /// replaced by exactly that set.
    async fn update_with_categories(
        &self,
        post: Post,
        category_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepoError>;
}
