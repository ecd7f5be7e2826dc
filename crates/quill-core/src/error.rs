//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found using ID {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(RepoError),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

/// Store failures reach the caller unclassified, except a lost race on a
/// unique column which is reported the same way as the pre-check.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation(field) => {
                Self::Conflict(format!("{field} already in use"))
            }
            other => Self::Repository(other),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violated on {0}")]
    UniqueViolation(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err: DomainError = RepoError::UniqueViolation("email".into()).into();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "email already in use"));
    }

    #[test]
    fn other_store_failures_pass_through() {
        let err: DomainError = RepoError::Connection("refused".into()).into();
        assert!(matches!(err, DomainError::Repository(RepoError::Connection(_))));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = DomainError::not_found("Author", "Fake ID");
        assert_eq!(err.to_string(), "Author not found using ID Fake ID");
    }
}
