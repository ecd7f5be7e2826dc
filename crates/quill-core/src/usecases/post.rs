use std::sync::Arc;

use chrono::Utc;

use super::{AuthorService, on_write, parse_id, provided, require};
use crate::domain::{Author, Post, PostSortField, Record, slugify};
use crate::error::{DomainError, DomainResult};
use crate::pagination::{Page, SearchParams, paginate};
use crate::ports::PostRepository;
use crate::uniqueness::UniquenessGuard;

#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub author_id: String,
    pub title: String,
    pub content: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub published: Option<bool>,
}

/// Partial update. The owning author cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
}

/// Post use cases.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    authors: AuthorService,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, authors: AuthorService) -> Self {
        Self { repo, authors }
    }

    pub async fn create(&self, input: CreatePostInput) -> DomainResult<Post> {
        require("Title", &input.title)?;
        require("Content", &input.content)?;
        require("Author ID", &input.author_id)?;

        let author = self.authors.get(&input.author_id).await?;

        let slug = normalize_slug(provided(input.slug).as_deref().unwrap_or(&input.title))?;
        UniquenessGuard::POST_SLUG
            .ensure_unique(self.repo.find_by_slug(&slug), None)
            .await?;

        let mut post = Post::new(author.id, input.title, slug, input.content);
        post.published = input.published.unwrap_or(false);

        let post = self.repo.insert(post).await?;
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(post)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Post> {
        let uuid = parse_id(Post::ENTITY, id)?;
        self.repo
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| DomainError::not_found(Post::ENTITY, id))
    }

    pub async fn list(&self, params: &SearchParams) -> DomainResult<Page<Post>> {
        Ok(paginate::<Post, PostSortField, _>(&*self.repo, params).await?)
    }

    pub async fn update(&self, input: UpdatePostInput) -> DomainResult<Post> {
        if input.id.trim().is_empty() {
            return Err(DomainError::validation("ID not provided"));
        }

        let mut post = self.get(&input.id).await?;

        if let Some(slug) = provided(input.slug) {
            let slug = normalize_slug(&slug)?;
            UniquenessGuard::POST_SLUG
                .ensure_unique(self.repo.find_by_slug(&slug), Some(post.id))
                .await?;
            post.slug = slug;
        }

        if let Some(title) = provided(input.title) {
            post.title = title;
        }

        if let Some(content) = provided(input.content) {
            post.content = content;
        }

        if let Some(published) = input.published {
            post.published = published;
        }

        post.updated_at = Utc::now();
        let id = post.id;
        let updated = self
            .repo
            .replace(post)
            .await
            .map_err(on_write(Post::ENTITY, id))?;

        tracing::info!(post_id = %updated.id, "Post updated");
        Ok(updated)
    }

    /// Hard delete. Returns the post as it was before removal.
    pub async fn delete(&self, id: &str) -> DomainResult<Post> {
        let post = self.get(id).await?;
        let removed = self
            .repo
            .delete(post.id)
            .await
            .map_err(on_write(Post::ENTITY, post.id))?;

        tracing::info!(post_id = %removed.id, "Post deleted");
        Ok(removed)
    }

    /// Resolve the author that owns a post.
    pub async fn author_of(&self, post_id: &str) -> DomainResult<Author> {
        let post = self.get(post_id).await?;
        self.authors.get(&post.author_id.to_string()).await
    }

    /// Every post written by one author, newest first.
    pub async fn list_by_author(&self, author_id: &str) -> DomainResult<Vec<Post>> {
        let author = self.authors.get(author_id).await?;
        Ok(self.repo.find_by_author_id(author.id).await?)
    }
}

fn normalize_slug(raw: &str) -> DomainResult<String> {
    let slug = slugify(raw);
    if slug.is_empty() {
        return Err(DomainError::validation(
            "Slug must contain at least one letter or digit",
        ));
    }
    Ok(slug)
}
