//! Author handlers.

use actix_web::{HttpResponse, web};
use quill_core::SearchParams;
use quill_core::usecases::{CreateAuthorInput, UpdateAuthorInput};
use quill_shared::dto::{CreateAuthorRequest, UpdateAuthorRequest};

use super::{author_response, page_response, post_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/authors?page=&per_page=&sort=&sort_dir=&filter=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let page = state.authors.list(&query).await?;
    Ok(HttpResponse::Ok().json(page_response(page, author_response)))
}

/// POST /api/authors
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let author = state
        .authors
        .create(CreateAuthorInput {
            name: req.name,
            email: req.email,
        })
        .await?;

    Ok(HttpResponse::Created().json(author_response(author)))
}

/// GET /api/authors/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let author = state.authors.get(&path).await?;
    Ok(HttpResponse::Ok().json(author_response(author)))
}

/// PATCH /api/authors/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let author = state
        .authors
        .update(UpdateAuthorInput {
            id: path.into_inner(),
            name: req.name,
            email: req.email,
        })
        .await?;

    Ok(HttpResponse::Ok().json(author_response(author)))
}

/// DELETE /api/authors/{id} - responds with the removed author.
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let author = state.authors.delete(&path).await?;
    Ok(HttpResponse::Ok().json(author_response(author)))
}

/// GET /api/authors/{id}/posts
pub async fn posts(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(&path).await?;
    let body: Vec<_> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}
