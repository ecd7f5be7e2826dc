use std::cmp::Ordering;

use async_trait::async_trait;

use quill_core::domain::{Author, AuthorSortField};
use quill_core::error::RepoError;
use quill_core::ports::AuthorRepository;

use super::{InMemoryAuthorRepository, MemoryRecord, collate};
use crate::mask_email;

impl MemoryRecord for Author {
    type Field = AuthorSortField;

    fn filter_text(&self) -> &str {
        &self.name
    }

    fn compare_by(&self, other: &Self, field: AuthorSortField) -> Ordering {
        match field {
            AuthorSortField::Name => collate(&self.name, &other.name),
            AuthorSortField::Email => collate(&self.email, &other.email),
            AuthorSortField::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("email", self.email.as_str())]
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError> {
        tracing::debug!(author_email = %mask_email(email), "Finding author by email");

        let rows = self.rows.read().await;
        Ok(rows.iter().find(|author| author.email == email).cloned())
    }
}
