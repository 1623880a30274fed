//! In-memory repositories - used as fallback when PostgreSQL is unavailable.
//!
//! Data is lost on process restart.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bloghub_core::domain::{Category, CategorySummary, Post, PostWithCategories};
use bloghub_core::error::RepoError;
use bloghub_core::ports::{BaseRepository, CategoryRepository, PostRepository};
use bloghub_core::query::{PostCategoryRow, PostPredicate, reshape};

#[derive(Debug, Clone, Copy)]
struct Link {
    post_id: Uuid,
    category_id: Uuid,
}

#[derive(Default)]
struct Tables {
    categories: HashMap<Uuid, Category>,
    posts: HashMap<Uuid, Post>,
    /// `post_categories`, in insertion order.
    links: Vec<Link>,
}

impl Tables {
    fn check_categories(&self, category_ids: &[Uuid]) -> Result<(), RepoError> {
        match category_ids
            .iter()
            .find(|id| !self.categories.contains_key(id))
        {
            Some(missing) => Err(RepoError::ForeignKey(format!(
                "category {missing} does not exist"
            ))),
            None => Ok(()),
        }
    }

    fn post_slug_taken(&self, slug: &str, except: Uuid) -> bool {
        self.posts
            .values()
            .any(|p| p.slug == slug && p.id != except)
    }

    fn category_slug_taken(&self, slug: &str, except: Uuid) -> bool {
        self.categories
            .values()
            .any(|c| c.slug == slug && c.id != except)
    }

    fn link(&mut self, post_id: Uuid, category_ids: &[Uuid]) {
        self.links.extend(category_ids.iter().map(|&category_id| Link {
            post_id,
            category_id,
        }));
    }

    fn rows(&self, post: &Post) -> Vec<PostCategoryRow> {
        let rows: Vec<PostCategoryRow> = self
            .links
            .iter()
            .filter(|l| l.post_id == post.id)
            .filter_map(|l| self.categories.get(&l.category_id))
            .map(|c| PostCategoryRow {
                post: post.clone(),
                category: Some(CategorySummary::from(c)),
            })
            .collect();

        if rows.is_empty() {
            vec![PostCategoryRow {
                post: post.clone(),
                category: None,
            }]
        } else {
            rows
        }
    }
}

/// Category and post storage behind a single async RwLock.
///
/// Every write takes the write lock once and checks all constraints before
/// touching any table, so a failed write leaves nothing behind.
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.links.retain(|l| l.category_id != id);
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by_key(|c| Reverse((c.created_at, c.id)));
        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.category_slug_taken(&category.slug, category.id) {
            return Err(RepoError::Constraint(format!(
                "categories.slug '{}' already exists",
                category.slug
            )));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        if tables.category_slug_taken(&category.slug, category.id) {
            return Err(RepoError::Constraint(format!(
                "categories.slug '{}' already exists",
                category.slug
            )));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.links.retain(|l| l.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository {
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().any(|p| p.slug == slug))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .find(|p| p.slug == slug)
            .and_then(|p| reshape(tables.rows(p)).into_iter().next()))
    }

    async fn post_ids_in_category(&self, category_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .iter()
            .filter(|l| l.category_id == category_id)
            .map(|l| l.post_id)
            .collect())
    }

    async fn page_ids(
        &self,
        predicate: &PostPredicate,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| predicate.matches(p))
            .collect();
        matching.sort_by_key(|p| Reverse((p.created_at, p.id)));

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| p.id)
            .collect())
    }

    async fn rows_for(&self, ids: &[Uuid]) -> Result<Vec<PostCategoryRow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.posts.get(id))
            .flat_map(|p| tables.rows(p))
            .collect())
    }

    async fn insert_with_categories(
        &self,
        post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.post_slug_taken(&post.slug, post.id) {
            return Err(RepoError::Constraint(format!(
                "posts.slug '{}' already exists",
                post.slug
            )));
        }
        tables.check_categories(category_ids)?;

        tables.posts.insert(post.id, post.clone());
        tables.link(post.id, category_ids);
        Ok(post)
    }

    async fn update_with_categories(
        &self,
        post: Post,
        category_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if tables.post_slug_taken(&post.slug, post.id) {
            return Err(RepoError::Constraint(format!(
                "posts.slug '{}' already exists",
                post.slug
            )));
        }
        if let Some(ids) = category_ids {
            tables.check_categories(ids)?;
        }

        tables.posts.insert(post.id, post.clone());
        if let Some(ids) = category_ids {
            tables.links.retain(|l| l.post_id != post.id);
            tables.link(post.id, ids);
        }
        Ok(post)
    }
}
