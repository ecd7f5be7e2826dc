//! Use cases - one linear protocol per operation, orchestrating the record
//! store, the pagination engine and the uniqueness guard.

mod author;
mod post;

pub use author::{AuthorService, CreateAuthorInput, UpdateAuthorInput};
pub use post::{CreatePostInput, PostService, UpdatePostInput};

use uuid::Uuid;

use crate::error::{DomainError, DomainResult, RepoError};

/// Fail with `Validation` when a required field is missing or blank.
fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} not provided")));
    }
    Ok(())
}

/// Partial-update staging: absent and empty values both mean "unchanged".
fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Identifiers that cannot be parsed cannot exist in the store either.
fn parse_id(entity: &'static str, raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::not_found(entity, raw))
}

/// A row that vanished between the fetch and the write is still a miss on
/// the caller's identifier.
fn on_write(entity: &'static str, id: Uuid) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity, id),
        other => other.into(),
    }
}
