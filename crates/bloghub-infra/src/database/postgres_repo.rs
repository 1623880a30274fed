//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, DbConn, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use bloghub_core::domain::{Category, CategorySummary, Post, PostWithCategories};
use bloghub_core::error::RepoError;
use bloghub_core::ports::{CategoryRepository, PostRepository};
use bloghub_core::query::{PostCategoryRow, PostPredicate, reshape};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_category::{self, Entity as PostCategoryEntity};
use super::error::repo_err;
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_desc(category::Column::CreatedAt)
            .order_by_desc(category::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let model = category::ActiveModel::from(category)
            .insert(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let model = category::ActiveModel::from(category)
            .update(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let count = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .count(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(count > 0)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError> {
        let Some(model) = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        let rows = join_rows(self.db.as_ref(), vec![model]).await?;
        Ok(reshape(rows).into_iter().next())
    }

    async fn post_ids_in_category(&self, category_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        PostCategoryEntity::find()
            .select_only()
            .column(post_category::Column::PostId)
            .filter(post_category::Column::CategoryId.eq(category_id))
            .into_tuple::<Uuid>()
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)
    }

    async fn page_ids(
        &self,
        predicate: &PostPredicate,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Uuid>, RepoError> {
        let mut condition = Condition::all();

        if let Some(published) = predicate.published {
            condition = condition.add(post::Column::Published.eq(published));
        }
        if let Some(term) = &predicate.search {
            let pattern = PostPredicate::like_pattern(term);
            let like = |col: post::Column| {
                Expr::col((PostEntity, col)).like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            condition = condition.add(
                Condition::any()
                    .add(like(post::Column::Title))
                    .add(like(post::Column::Content))
                    .add(like(post::Column::Excerpt)),
            );
        }
        if let Some(ids) = &predicate.ids {
            condition = condition.add(post::Column::Id.is_in(ids.iter().copied()));
        }

        PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .filter(condition)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .into_tuple::<Uuid>()
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)
    }

    async fn rows_for(&self, ids: &[Uuid]) -> Result<Vec<PostCategoryRow>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<Uuid, post::Model> = PostEntity::find()
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let ordered = ids.iter().filter_map(|id| by_id.remove(id)).collect();
        join_rows(self.db.as_ref(), ordered).await
    }

    async fn insert_with_categories(
        &self,
        post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        match insert_post(&txn, post, category_ids).await {
            Ok(model) => {
                txn.commit().await.map_err(repo_err)?;
                Ok(model.into())
            }
            Err(e) => {
                txn.rollback().await.ok();
                tracing::warn!(error = %e, "Post insert rolled back");
                Err(repo_err(e))
            }
        }
    }

    async fn update_with_categories(
        &self,
        post: Post,
        category_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        match update_post(&txn, post, category_ids).await {
            Ok(model) => {
                txn.commit().await.map_err(repo_err)?;
                Ok(model.into())
            }
            Err(e) => {
                txn.rollback().await.ok();
                tracing::warn!(error = %e, "Post update rolled back");
                Err(repo_err(e))
            }
        }
    }
}

async fn insert_post(
    txn: &DatabaseTransaction,
    post: Post,
    category_ids: &[Uuid],
) -> Result<post::Model, DbErr> {
    let model = post::ActiveModel::from(post).insert(txn).await?;
    insert_links(txn, model.id, category_ids).await?;
    Ok(model)
}

async fn update_post(
    txn: &DatabaseTransaction,
    post: Post,
    category_ids: Option<&[Uuid]>,
) -> Result<post::Model, DbErr> {
    let model = post::ActiveModel::from(post).update(txn).await?;

    if let Some(category_ids) = category_ids {
        PostCategoryEntity::delete_many()
            .filter(post_category::Column::PostId.eq(model.id))
            .exec(txn)
            .await?;
        insert_links(txn, model.id, category_ids).await?;
    }

    Ok(model)
}

async fn insert_links(
    txn: &DatabaseTransaction,
    post_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), DbErr> {
    if category_ids.is_empty() {
        return Ok(());
    }

    // One microsecond apart so reads return links in the order supplied.
    let now = Utc::now();
    let links = category_ids
        .iter()
        .enumerate()
        .map(|(i, category_id)| post_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            post_id: Set(post_id),
            category_id: Set(*category_id),
            created_at: Set((now + Duration::microseconds(i as i64)).into()),
        });

    PostCategoryEntity::insert_many(links)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

/// Left-join rows for `posts`, kept in the given order. A post with no
/// categories yields a single row without one.
async fn join_rows(
    db: &DbConn,
    posts: Vec<post::Model>,
) -> Result<Vec<PostCategoryRow>, RepoError> {
    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

    let links = PostCategoryEntity::find()
        .filter(post_category::Column::PostId.is_in(ids))
        .find_also_related(CategoryEntity)
        .order_by_asc(post_category::Column::CreatedAt)
        .order_by_asc(post_category::Column::Id)
        .all(db)
        .await
        .map_err(repo_err)?;

    let mut categories: HashMap<Uuid, Vec<CategorySummary>> = HashMap::new();
    for (link, category) in links {
        if let Some(category) = category {
            categories
                .entry(link.post_id)
                .or_default()
                .push(category.into());
        }
    }

    let mut rows = Vec::with_capacity(posts.len());
    for model in posts {
        let post: Post = model.into();
        match categories.remove(&post.id) {
            Some(list) => rows.extend(list.into_iter().map(|category| PostCategoryRow {
                post: post.clone(),
                category: Some(category),
            })),
            None => rows.push(PostCategoryRow {
                post,
                category: None,
            }),
        }
    }

    Ok(rows)
}
