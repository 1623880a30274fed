use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Category, CategoryChanges, NewCategory};
use crate::error::DomainError;
use crate::ports::CategoryRepository;
use crate::slug::require_slug;

const DUPLICATE_NAME: &str = "A category with this name already exists";

/// CRUD over categories with name-derived, unique slugs.
#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// All categories, newest first.
    pub async fn list_all(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Category, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category, DomainError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", slug))
    }

    pub async fn create(&self, input: NewCategory) -> Result<Category, DomainError> {
        input.validate()?;
        let slug = slug_for(&input.name)?;

        if self.repo.find_by_slug(&slug).await?.is_some() {
            return Err(DomainError::conflict(DUPLICATE_NAME));
        }

        let category = self
            .repo
            .insert(Category::new(input.name, slug, input.description))
            .await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Apply `changes`. A new name regenerates the slug, which must not
    /// belong to another category.
    pub async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<Category, DomainError> {
        changes.validate()?;
        let mut category = self.get_by_id(id).await?;

        if let Some(name) = changes.name {
            let slug = slug_for(&name)?;
            if slug != category.slug {
                if let Some(other) = self.repo.find_by_slug(&slug).await? {
                    if other.id != id {
                        return Err(DomainError::conflict(DUPLICATE_NAME));
                    }
                }
            }
            category.name = name;
            category.slug = slug;
        }
        if let Some(description) = changes.description {
            category.description = Some(description);
        }
        category.updated_at = Utc::now();

        let category = self
            .repo
            .update(category)
            .await
            .map_err(|e| DomainError::from_repo(e, "Category", id))?;

        tracing::info!(category_id = %id, slug = %category.slug, "Category updated");
        Ok(category)
    }

    /// Delete a category; its post links go with it, the posts stay.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::from_repo(e, "Category", id))?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

fn slug_for(name: &str) -> Result<String, DomainError> {
    require_slug(name)
        .ok_or_else(|| DomainError::validation("name: must contain at least one letter or digit"))
}
