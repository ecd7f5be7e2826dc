use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;
use crate::pagination::SortField;

/// Post entity - a blog post owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, unpublished post.
    pub fn new(author_id: Uuid, title: String, slug: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            content,
            published: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Post {
    const ENTITY: &'static str = "Post";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields a post listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSortField {
    Title,
    Slug,
    CreatedAt,
}

impl SortField for PostSortField {
    const DEFAULT: Self = Self::CreatedAt;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "slug" => Some(Self::Slug),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Slug => "slug",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Derive a URL slug from a title: ASCII alphanumerics lowercased, every
/// other run of characters collapsed into a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
