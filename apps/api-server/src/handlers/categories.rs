//! Category handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloghub_core::domain::{Category, CategoryChanges, NewCategory};
use bloghub_shared::dto::{
    CategoryResponse, CreateCategoryRequest, DeletedResponse, UpdateCategoryRequest,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list_all().await?;
    let body: Vec<CategoryResponse> = categories.into_iter().map(category_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state.categories.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category_response(category)))
}

/// GET /api/categories/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = state.categories.get_by_slug(&path).await?;
    Ok(HttpResponse::Ok().json(category_response(category)))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .categories
        .create(NewCategory {
            name: req.name,
            description: req.description,
        })
        .await?;

    Ok(HttpResponse::Created().json(category_response(category)))
}

/// PATCH /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .categories
        .update(
            path.into_inner(),
            CategoryChanges {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(category_response(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.categories.delete(id).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse { id }))
}
