//! Post handlers.

use actix_web::{HttpResponse, web};
use quill_core::SearchParams;
use quill_core::usecases::{CreatePostInput, UpdatePostInput};
use quill_shared::dto::{CreatePostRequest, UpdatePostRequest};

use super::{author_response, page_response, post_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=&per_page=&sort=&sort_dir=&filter=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let page = state.posts.list(&query).await?;
    Ok(HttpResponse::Ok().json(page_response(page, post_response)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(CreatePostInput {
            author_id: req.author_id,
            title: req.title,
            content: req.content,
            slug: req.slug,
            published: req.published,
        })
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.get(&path).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .update(UpdatePostInput {
            id: path.into_inner(),
            title: req.title,
            content: req.content,
            slug: req.slug,
            published: req.published,
        })
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.delete(&path).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// GET /api/posts/{id}/author
pub async fn author(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let author = state.posts.author_of(&path).await?;
    Ok(HttpResponse::Ok().json(author_response(author)))
}
