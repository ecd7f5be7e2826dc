use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Author, AuthorSortField, Post, PostSortField};
use crate::error::RepoError;
use crate::pagination::SearchQuery;

/// Generic record store defining the operations every entity needs.
#[async_trait]
pub trait BaseRepository<T, F>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Fails with `UniqueViolation` on a taken unique column.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite every column of an existing entity, keyed by its ID.
    async fn replace(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, returning the removed row.
    async fn delete(&self, id: Uuid) -> Result<T, RepoError>;

    /// One page of entities matching the query's filter, in the query's order.
    async fn scan(&self, query: &SearchQuery<F>) -> Result<Vec<T>, RepoError>;

    /// Number of entities matching the filter, ignoring pagination.
    async fn count(&self, filter: Option<&str>) -> Result<u64, RepoError>;
}

/// Author repository with domain-specific methods.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, AuthorSortField> {
    /// Find an author by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostSortField> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// All posts of one author, newest first.
    async fn find_by_author_id(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Remove every post of one author. Returns how many rows went.
    async fn delete_by_author_id(&self, author_id: Uuid) -> Result<u64, RepoError>;
}
