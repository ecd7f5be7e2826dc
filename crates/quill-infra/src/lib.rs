//! # Quill Infrastructure
//!
//! Concrete implementations of the record store ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL record store via SeaORM

pub mod database;
pub mod memory;

// Re-exports - In-Memory
pub use memory::{InMemoryAuthorRepository, InMemoryPostRepository, InMemoryRepository};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresAuthorRepository, PostgresPostRepository};

/// Mask an email address for logging so no PII ends up in logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}
