use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Category;

const WORDS_PER_MINUTE: usize = 200;

/// Post entity - represents a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub author_id: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and timestamps.
    pub fn new(author_id: String, slug: String, input: &NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            slug,
            content: input.content.clone(),
            excerpt: input.excerpt.clone(),
            published: input.published,
            author_id,
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Estimated reading time in whole minutes, rounded up.
    pub fn reading_time(&self) -> usize {
        self.word_count().div_ceil(WORDS_PER_MINUTE)
    }
}

/// The slice of a category embedded in post results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// A post together with the categories it is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithCategories {
    #[serde(flatten)]
    pub post: Post,
    pub categories: Vec<CategorySummary>,
}

/// Input for creating a post.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    /// Explicit slug; derived from the title when absent.
    #[validate(length(min = 1, max = 255, message = "slug must be 1-255 characters"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[validate(length(max = 500, message = "excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,
    pub published: bool,
    pub category_ids: Vec<Uuid>,
    pub image_url: Option<String>,
}

/// Partial update of a post. `None` leaves the field untouched.
///
/// `category_ids: Some(vec![])` clears every association, while `None` keeps
/// the current ones.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostChanges {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "slug must be 1-255 characters"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: Option<String>,
    #[validate(length(max = 500, message = "excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub category_ids: Option<Vec<Uuid>>,
    pub image_url: Option<String>,
}

impl PostChanges {
    /// Apply the scalar changes to `post`. Slug and timestamps are the
    /// caller's business.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(excerpt) = &self.excerpt {
            post.excerpt = Some(excerpt.clone());
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        if let Some(image_url) = &self.image_url {
            post.image_url = Some(image_url.clone());
        }
    }
}
