use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{NewPost, Post, PostChanges, PostWithCategories};
use crate::error::DomainError;
use crate::ports::PostRepository;
use crate::query::{PostFilter, reshape};
use crate::slug::{is_valid_slug, require_slug};

const DUPLICATE_SLUG: &str = "A post with this slug already exists";
const MAX_AUTHOR_ID_LEN: usize = 100;

/// CRUD over posts, their category links and filtered listing.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// One page of posts with their categories, newest first.
    ///
    /// Pagination counts posts, not join rows, so every returned post carries
    /// its full category list.
    pub async fn list(&self, filter: PostFilter) -> Result<Vec<PostWithCategories>, DomainError> {
        filter.validate()?;

        let ids = match filter.category_id {
            Some(category_id) => {
                let ids = self.repo.post_ids_in_category(category_id).await?;
                if ids.is_empty() {
                    tracing::debug!(%category_id, "No posts in category");
                    return Ok(Vec::new());
                }
                Some(ids)
            }
            None => None,
        };

        let predicate = filter.predicate(ids);
        let page = self
            .repo
            .page_ids(&predicate, filter.limit, filter.offset)
            .await?;
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.repo.rows_for(&page).await?;
        Ok(reshape(rows))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<PostWithCategories, DomainError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", slug))
    }

    /// Create a post owned by `author_id` together with its category links.
    pub async fn create(&self, author_id: &str, input: NewPost) -> Result<Post, DomainError> {
        input.validate()?;
        check_author(author_id)?;

        let slug = match &input.slug {
            Some(slug) => explicit_slug(slug)?,
            None => title_slug(&input.title)?,
        };

        if self.repo.slug_exists(&slug).await? {
            return Err(DomainError::conflict(DUPLICATE_SLUG));
        }

        let category_ids = unique_ids(&input.category_ids);
        let post = Post::new(author_id.to_string(), slug, &input);
        let post = self.repo.insert_with_categories(post, &category_ids).await?;

        tracing::info!(
            post_id = %post.id,
            slug = %post.slug,
            categories = category_ids.len(),
            "Post created"
        );
        Ok(post)
    }

    /// Apply a partial update.
    ///
    /// An explicit slug wins; otherwise a changed title regenerates it.
    pub async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        changes.validate()?;

        let mut post = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        let slug = match (&changes.slug, &changes.title) {
            (Some(slug), _) => explicit_slug(slug)?,
            (None, Some(title)) if *title != post.title => title_slug(title)?,
            _ => post.slug.clone(),
        };

        if slug != post.slug && self.repo.slug_exists(&slug).await? {
            return Err(DomainError::conflict(DUPLICATE_SLUG));
        }

        changes.apply_to(&mut post);
        post.slug = slug;
        post.updated_at = Utc::now();

        let category_ids = changes.category_ids.as_deref().map(unique_ids);
        let post = self
            .repo
            .update_with_categories(post, category_ids.as_deref())
            .await
            .map_err(|e| DomainError::from_repo(e, "Post", id))?;

        tracing::info!(
            post_id = %id,
            slug = %post.slug,
            replaced_categories = category_ids.is_some(),
            "Post updated"
        );
        Ok(post)
    }

    /// Delete a post; its category links go with it, the categories stay.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::from_repo(e, "Post", id))?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }
}

fn explicit_slug(slug: &str) -> Result<String, DomainError> {
    if is_valid_slug(slug) {
        Ok(slug.to_string())
    } else {
        Err(DomainError::validation(
            "slug: must be lowercase letters and digits separated by single hyphens",
        ))
    }
}

fn title_slug(title: &str) -> Result<String, DomainError> {
    require_slug(title)
        .ok_or_else(|| DomainError::validation("title: must contain at least one letter or digit"))
}

fn check_author(author_id: &str) -> Result<(), DomainError> {
    let len = author_id.chars().count();
    if len == 0 || len > MAX_AUTHOR_ID_LEN {
        return Err(DomainError::validation("authorId: must be 1-100 characters"));
    }
    Ok(())
}

/// Drop repeated IDs, keeping first occurrences in order.
fn unique_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
