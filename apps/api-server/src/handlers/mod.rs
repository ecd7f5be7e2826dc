//! HTTP handlers and route configuration.

mod authors;
mod health;
mod posts;


use actix_web::web;
use quill_core::Page;
use quill_core::domain::{Author, Post};
use quill_shared::dto::{AuthorResponse, PageResponse, PostResponse};

use crate::middleware::error::{json_error_handler, query_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/authors")
                        .route("", web::get().to(authors::list))
                        .route("", web::post().to(authors::create))
                        .route("/{id}", web::get().to(authors::get))
                        .route("/{id}", web::patch().to(authors::update))
                        .route("/{id}", web::delete().to(authors::delete))
                        .route("/{id}/posts", web::get().to(authors::posts)),
                )
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/{id}", web::get().to(posts::get))
                        .route("/{id}", web::patch().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete))
                        .route("/{id}/author", web::get().to(posts::author)),
                ),
        );
}

pub(crate) fn author_response(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        name: author.name,
        email: author.email,
        created_at: author.created_at,
        updated_at: author.updated_at,
    }
}

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        published: post.published,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub(crate) fn page_response<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let page = page.map(f);
    PageResponse {
        items: page.items,
        current_page: page.current_page,
        per_page: page.per_page,
        last_page: page.last_page,
        total: page.total,
    }
}
