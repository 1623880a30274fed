//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloghub_core::DomainError;
use bloghub_core::domain::{NewPost, PostChanges, PostWithCategories};
use bloghub_core::query::{DEFAULT_LIMIT, PostFilter};
use bloghub_shared::dto::{
    CategorySummaryResponse, CreatePostRequest, DeletedResponse, PostListQuery, PostRef,
    PostResponse, UpdatePostRequest,
};

use crate::middleware::author::Author;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_response(item: PostWithCategories) -> PostResponse {
    let word_count = item.post.word_count();
    let reading_time = item.post.reading_time();
    let post = item.post;

    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        published: post.published,
        author_id: post.author_id,
        image_url: post.image_url,
        created_at: post.created_at,
        updated_at: post.updated_at,
        categories: item
            .categories
            .into_iter()
            .map(|c| CategorySummaryResponse {
                id: c.id,
                name: c.name,
                slug: c.slug,
            })
            .collect(),
        word_count,
        reading_time,
    }
}

fn to_filter(query: PostListQuery) -> Result<PostFilter, DomainError> {
    let offset = match query.offset {
        None => 0,
        Some(n) => u64::try_from(n)
            .map_err(|_| DomainError::validation("offset: must be zero or greater"))?,
    };
    // Negative limits fall through to the range check.
    let limit = query
        .limit
        .map(|n| u64::try_from(n).unwrap_or(0))
        .unwrap_or(DEFAULT_LIMIT);

    Ok(PostFilter {
        category_id: query.category_id,
        published: query.published,
        search: query.search,
        limit,
        offset,
    })
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let filter = to_filter(query.into_inner())?;
    let posts = state.posts.list(filter).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_slug(&path).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    author: Author,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = NewPost {
        title: req.title,
        slug: req.slug,
        content: req.content,
        excerpt: req.excerpt,
        published: req.published,
        category_ids: req.category_ids,
        image_url: req.image_url,
    };

    let post = state.posts.create(&author.0, input).await?;
    Ok(HttpResponse::Created().json(PostRef {
        id: post.id,
        slug: post.slug,
    }))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        slug: req.slug,
        content: req.content,
        excerpt: req.excerpt,
        published: req.published,
        category_ids: req.category_ids,
        image_url: req.image_url,
    };

    let post = state.posts.update(path.into_inner(), changes).await?;
    Ok(HttpResponse::Ok().json(PostRef {
        id: post.id,
        slug: post.slug,
    }))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse { id }))
}
