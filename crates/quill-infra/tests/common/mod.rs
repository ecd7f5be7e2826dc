#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use quill_core::domain::{Author, Post};
use quill_core::ports::BaseRepository;
use quill_core::{AuthorService, PostService};
use quill_infra::{InMemoryAuthorRepository, InMemoryPostRepository};

pub struct Fixture {
    pub authors_repo: Arc<InMemoryAuthorRepository>,
    pub posts_repo: Arc<InMemoryPostRepository>,
    pub authors: AuthorService,
    pub posts: PostService,
}

pub fn fixture() -> Fixture {
    let authors_repo = Arc::new(InMemoryAuthorRepository::new());
    let posts_repo = Arc::new(InMemoryPostRepository::new());
    let authors = AuthorService::new(authors_repo.clone(), posts_repo.clone());
    let posts = PostService::new(posts_repo.clone(), authors.clone());
    Fixture {
        authors_repo,
        posts_repo,
        authors,
        posts,
    }
}

/// Insert authors straight into the store with strictly ascending creation
/// times, one millisecond apart, and emails `author{i}@a.com`.
pub async fn seed_authors(repo: &InMemoryAuthorRepository, names: &[&str]) -> Vec<Author> {
    let base = Utc::now();
    let mut seeded = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let mut author = Author::new(name.to_string(), format!("author{i}@a.com"));
        author.created_at = base + Duration::milliseconds(i as i64);
        author.updated_at = author.created_at;
        seeded.push(repo.insert(author).await.unwrap());
    }
    seeded
}

/// Insert posts for one author with ascending creation times.
pub async fn seed_posts(repo: &InMemoryPostRepository, author: &Author, titles: &[&str]) -> Vec<Post> {
    let base = Utc::now();
    let mut seeded = Vec::with_capacity(titles.len());
    for (i, title) in titles.iter().enumerate() {
        let mut post = Post::new(
            author.id,
            title.to_string(),
            format!("post-{i}"),
            "body".to_string(),
        );
        post.created_at = base + Duration::milliseconds(i as i64);
        post.updated_at = post.created_at;
        seeded.push(repo.insert(post).await.unwrap());
    }
    seeded
}

pub fn names(authors: &[Author]) -> Vec<&str> {
    authors.iter().map(|a| a.name.as_str()).collect()
}
