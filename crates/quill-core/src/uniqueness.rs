//! Application-level check for unique columns.
//!
//! The check runs before the write, so two writers can both pass it. Stores
//! back it with a real unique constraint; this guard only gives the caller a
//! clear error in the common, uncontended case.

use std::future::Future;

use uuid::Uuid;

use crate::domain::Record;
use crate::error::{DomainError, DomainResult, RepoError};

#[derive(Debug, Clone, Copy)]
pub struct UniquenessGuard {
    field: &'static str,
    message: &'static str,
}

impl UniquenessGuard {
    pub const AUTHOR_EMAIL: Self = Self {
        field: "email",
        message: "Email address already in use",
    };

    pub const POST_SLUG: Self = Self {
        field: "slug",
        message: "Slug already in use",
    };

    /// A found record conflicts unless it is the record being updated.
    pub fn conflicts<T: Record>(existing: Option<&T>, exclude_id: Option<Uuid>) -> bool {
        existing.is_some_and(|record| Some(record.id()) != exclude_id)
    }

    /// Await `lookup` (a find-by-unique-column call) and fail with
    /// `Conflict` if it returns a different record.
    pub async fn ensure_unique<T, Fut>(&self, lookup: Fut, exclude_id: Option<Uuid>) -> DomainResult<()>
    where
        T: Record,
        Fut: Future<Output = Result<Option<T>, RepoError>>,
    {
        let existing = lookup.await?;
        if Self::conflicts(existing.as_ref(), exclude_id) {
            tracing::warn!(field = self.field, "Unique value already taken");
            return Err(DomainError::conflict(self.message));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Author;

    fn author() -> Author {
        Author::new("Ada".into(), "ada@example.com".into())
    }

    #[test]
    fn nothing_found_is_not_a_conflict() {
        assert!(!UniquenessGuard::conflicts::<Author>(None, None));
        assert!(!UniquenessGuard::conflicts::<Author>(None, Some(Uuid::new_v4())));
    }

    #[test]
    fn found_record_conflicts_without_exclusion() {
        let existing = author();
        assert!(UniquenessGuard::conflicts(Some(&existing), None));
    }

    #[test]
    fn own_record_is_excluded() {
        let existing = author();
        assert!(!UniquenessGuard::conflicts(Some(&existing), Some(existing.id)));
        assert!(UniquenessGuard::conflicts(Some(&existing), Some(Uuid::new_v4())));
    }

    #[tokio::test]
    async fn ensure_unique_reports_conflict() {
        let existing = author();
        let err = UniquenessGuard::AUTHOR_EMAIL
            .ensure_unique(async { Ok(Some(existing)) }, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "Email address already in use"));
    }

    #[tokio::test]
    async fn ensure_unique_propagates_store_failure() {
        let err = UniquenessGuard::AUTHOR_EMAIL
            .ensure_unique(
                async { Err::<Option<Author>, _>(RepoError::Query("boom".into())) },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Repository(RepoError::Query(_))));
    }
}
