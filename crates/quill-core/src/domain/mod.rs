//! Domain entities - the core business objects.

use chrono::{DateTime, Utc};
use uuid::Uuid;

mod author;
mod post;

pub use author::{Author, AuthorSortField};
pub use post::{Post, PostSortField, slugify};

/// Common shape of every stored entity.
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable entity name used in error messages.
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;
}
