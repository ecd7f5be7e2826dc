use std::sync::Arc;

use chrono::Utc;

use super::{on_write, parse_id, provided, require};
use crate::domain::{Author, AuthorSortField, Record};
use crate::error::{DomainError, DomainResult};
use crate::pagination::{Page, SearchParams, paginate};
use crate::ports::{AuthorRepository, PostRepository};
use crate::uniqueness::UniquenessGuard;

#[derive(Debug, Clone, Default)]
pub struct CreateAuthorInput {
    pub name: String,
    pub email: String,
}

/// Partial update. Fields left `None` (or empty) keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateAuthorInput {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Author use cases. Holds the post store so deleting an author also
/// removes the posts it owns.
#[derive(Clone)]
pub struct AuthorService {
    repo: Arc<dyn AuthorRepository>,
    posts: Arc<dyn PostRepository>,
}

impl AuthorService {
    pub fn new(repo: Arc<dyn AuthorRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { repo, posts }
    }

    pub async fn create(&self, input: CreateAuthorInput) -> DomainResult<Author> {
        require("Name", &input.name)?;
        require("Email", &input.email)?;

        UniquenessGuard::AUTHOR_EMAIL
            .ensure_unique(self.repo.find_by_email(&input.email), None)
            .await?;

        let author = self.repo.insert(Author::new(input.name, input.email)).await?;
        tracing::info!(author_id = %author.id, "Author created");
        Ok(author)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Author> {
        let uuid = parse_id(Author::ENTITY, id)?;
        self.repo
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| DomainError::not_found(Author::ENTITY, id))
    }

    pub async fn list(&self, params: &SearchParams) -> DomainResult<Page<Author>> {
        Ok(paginate::<Author, AuthorSortField, _>(&*self.repo, params).await?)
    }

    pub async fn update(&self, input: UpdateAuthorInput) -> DomainResult<Author> {
        if input.id.trim().is_empty() {
            return Err(DomainError::validation("ID not provided"));
        }

        let mut author = self.get(&input.id).await?;

        if let Some(email) = provided(input.email) {
            UniquenessGuard::AUTHOR_EMAIL
                .ensure_unique(self.repo.find_by_email(&email), Some(author.id))
                .await?;
            author.email = email;
        }

        if let Some(name) = provided(input.name) {
            author.name = name;
        }

        author.updated_at = Utc::now();
        let id = author.id;
        let updated = self
            .repo
            .replace(author)
            .await
            .map_err(on_write(Author::ENTITY, id))?;

        tracing::info!(author_id = %updated.id, "Author updated");
        Ok(updated)
    }

    /// Hard delete, cascading to the author's posts. Returns the author as
    /// it was before removal.
    pub async fn delete(&self, id: &str) -> DomainResult<Author> {
        let author = self.get(id).await?;
        let removed = self
            .repo
            .delete(author.id)
            .await
            .map_err(on_write(Author::ENTITY, author.id))?;

        // Stores with a cascading foreign key have nothing left to remove here.
        let posts = self.posts.delete_by_author_id(removed.id).await?;

        tracing::info!(author_id = %removed.id, posts, "Author deleted");
        Ok(removed)
    }
}
