use std::cmp::Ordering;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::{Post, PostSortField};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::{InMemoryPostRepository, MemoryRecord, collate};

impl MemoryRecord for Post {
    type Field = PostSortField;

    fn filter_text(&self) -> &str {
        &self.title
    }

    fn compare_by(&self, other: &Self, field: PostSortField) -> Ordering {
        match field {
            PostSortField::Title => collate(&self.title, &other.title),
            PostSortField::Slug => self.slug.cmp(&other.slug),
            PostSortField::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("slug", self.slug.as_str())]
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|post| post.slug == slug).cloned())
    }

    async fn find_by_author_id(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.read().await;
        let mut posts: Vec<Post> = rows
            .iter()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn delete_by_author_id(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|post| post.author_id != author_id);
        Ok((before - rows.len()) as u64)
    }
}
