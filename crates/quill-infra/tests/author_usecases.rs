mod common;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::AuthorService;
use quill_core::domain::{Author, AuthorSortField};
use quill_core::error::{DomainError, RepoError};
use quill_core::pagination::{SearchParams, SearchQuery};
use quill_core::ports::{AuthorRepository, BaseRepository};
use quill_core::usecases::{CreateAuthorInput, CreatePostInput, UpdateAuthorInput};
use quill_infra::{InMemoryAuthorRepository, InMemoryPostRepository};

use common::{fixture, seed_authors, seed_posts};

fn create_input(name: &str, email: &str) -> CreateAuthorInput {
    CreateAuthorInput {
        name: name.to_string(),
        email: email.to_string(),
    }
}

// Create

#[tokio::test]
async fn create_returns_retrievable_author() {
    let fx = fixture();

    let author = fx.authors.create(create_input("Ada", "ada@a.com")).await.unwrap();
    assert_eq!(author.name, "Ada");
    assert_eq!(author.email, "ada@a.com");

    let fetched = fx.authors.get(&author.id.to_string()).await.unwrap();
    assert_eq!(fetched, author);
}

#[tokio::test]
async fn create_rejects_taken_email() {
    let fx = fixture();
    fx.authors.create(create_input("Ada", "a@a.com")).await.unwrap();

    let err = fx.authors.create(create_input("Bob", "a@a.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(fx.authors_repo.len().await, 1);
}

#[tokio::test]
async fn create_requires_name_and_email() {
    let fx = fixture();

    let err = fx.authors.create(create_input("", "a@a.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = fx.authors.create(create_input("Ada", "  ")).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    assert!(fx.authors_repo.is_empty().await);
}

// Get

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let fx = fixture();

    let err = fx.authors.get("Fake id").await.unwrap_err();
    assert_eq!(err.to_string(), "Author not found using ID Fake id");

    let missing = Uuid::new_v4().to_string();
    let err = fx.authors.get(&missing).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { id, .. } if id == missing));
}

// Update

#[tokio::test]
async fn update_requires_id() {
    let fx = fixture();

    let err = fx
        .authors
        .update(UpdateAuthorInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(msg) if msg == "ID not provided"));
}

#[tokio::test]
async fn update_unknown_id_is_not_found_and_writes_nothing() {
    let fx = fixture();
    let seeded = seed_authors(&fx.authors_repo, &["Ada"]).await;

    let err = fx
        .authors
        .update(UpdateAuthorInput {
            id: Uuid::new_v4().to_string(),
            name: Some("Changed".into()),
            email: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let stored = fx.authors.get(&seeded[0].id.to_string()).await.unwrap();
    assert_eq!(stored, seeded[0]);
}

#[tokio::test]
async fn update_rejects_email_of_another_author() {
    let fx = fixture();
    let seeded = seed_authors(&fx.authors_repo, &["Ada", "Bob"]).await;

    let err = fx
        .authors
        .update(UpdateAuthorInput {
            id: seeded[1].id.to_string(),
            name: None,
            email: Some(seeded[0].email.clone()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let bob = fx.authors.get(&seeded[1].id.to_string()).await.unwrap();
    assert_eq!(bob.email, seeded[1].email);
}

#[tokio::test]
async fn update_accepts_own_unchanged_email() {
    let fx = fixture();
    let seeded = seed_authors(&fx.authors_repo, &["Ada"]).await;

    let updated = fx
        .authors
        .update(UpdateAuthorInput {
            id: seeded[0].id.to_string(),
            name: Some("Ada Lovelace".into()),
            email: Some(seeded[0].email.clone()),
        })
        .await
        .unwrap();
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.email, seeded[0].email);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let fx = fixture();
    let seeded = seed_authors(&fx.authors_repo, &["Ada"]).await;
    let original = &seeded[0];

    let updated = fx
        .authors
        .update(UpdateAuthorInput {
            id: original.id.to_string(),
            name: None,
            email: Some("new@a.com".into()),
        })
        .await
        .unwrap();
    assert_eq!(updated.name, original.name);
    assert_eq!(updated.email, "new@a.com");
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);

    // empty strings are treated as "not supplied"
    let updated = fx
        .authors
        .update(UpdateAuthorInput {
            id: original.id.to_string(),
            name: Some(String::new()),
            email: Some(String::new()),
        })
        .await
        .unwrap();
    assert_eq!(updated.name, original.name);
    assert_eq!(updated.email, "new@a.com");
}

// Delete

#[tokio::test]
async fn delete_returns_prior_state() {
    let fx = fixture();
    let seeded = seed_authors(&fx.authors_repo, &["Ada"]).await;

    let removed = fx.authors.delete(&seeded[0].id.to_string()).await.unwrap();
    assert_eq!(removed, seeded[0]);
    assert!(fx.authors_repo.is_empty().await);
}

#[tokio::test]
async fn delete_removes_the_authors_posts() {
    let fx = fixture();
    let seeded = seed_authors(&fx.authors_repo, &["Ada", "Bob"]).await;
    seed_posts(&fx.posts_repo, &seeded[0], &["One", "Two"]).await;
    let bobs = fx
        .posts
        .create(CreatePostInput {
            author_id: seeded[1].id.to_string(),
            title: "Three".into(),
            content: "body".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    fx.authors.delete(&seeded[0].id.to_string()).await.unwrap();

    let page = fx.posts.list(&SearchParams::default()).await.unwrap();
    assert_eq!(page.items, vec![bobs]);
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let fx = fixture();
    seed_authors(&fx.authors_repo, &["Ada"]).await;

    let err = fx.authors.delete("Fake id").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    assert_eq!(fx.authors_repo.len().await, 1);
}

// Concurrent writers

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_to_same_email_leave_one_winner() {
    let fx = fixture();
    let seeded = seed_authors(&fx.authors_repo, &["Ada", "Bob"]).await;

    let first = fx.authors.clone();
    let second = fx.authors.clone();
    let (ada_id, bob_id) = (seeded[0].id.to_string(), seeded[1].id.to_string());

    let a = tokio::spawn(async move {
        first
            .update(UpdateAuthorInput {
                id: ada_id,
                name: None,
                email: Some("shared@a.com".into()),
            })
            .await
    });
    let b = tokio::spawn(async move {
        second
            .update(UpdateAuthorInput {
                id: bob_id,
                name: None,
                email: Some("shared@a.com".into()),
            })
            .await
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(DomainError::Conflict(_))))
    );

    let page = fx.authors.list(&SearchParams::default()).await.unwrap();
    let shared = page
        .items
        .iter()
        .filter(|a| a.email == "shared@a.com")
        .count();
    assert_eq!(shared, 1);
}

/// Store wrapper whose email lookup always misses, as if a concurrent
/// writer committed between the pre-check and the write.
struct StaleLookup(Arc<InMemoryAuthorRepository>);

#[async_trait]
impl BaseRepository<Author, AuthorSortField> for StaleLookup {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn insert(&self, entity: Author) -> Result<Author, RepoError> {
        self.0.insert(entity).await
    }

    async fn replace(&self, entity: Author) -> Result<Author, RepoError> {
        self.0.replace(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<Author, RepoError> {
        self.0.delete(id).await
    }

    async fn scan(&self, query: &SearchQuery<AuthorSortField>) -> Result<Vec<Author>, RepoError> {
        self.0.scan(query).await
    }

    async fn count(&self, filter: Option<&str>) -> Result<u64, RepoError> {
        self.0.count(filter).await
    }
}

#[async_trait]
impl AuthorRepository for StaleLookup {
    async fn find_by_email(&self, _email: &str) -> Result<Option<Author>, RepoError> {
        Ok(None)
    }
}

#[tokio::test]
async fn store_constraint_catches_lost_race_on_create() {
    let inner = Arc::new(InMemoryAuthorRepository::new());
    let service = AuthorService::new(
        Arc::new(StaleLookup(inner.clone())),
        Arc::new(InMemoryPostRepository::new()),
    );

    service.create(create_input("Ada", "a@a.com")).await.unwrap();
    let err = service.create(create_input("Bob", "a@a.com")).await.unwrap_err();

    assert!(matches!(err, DomainError::Conflict(msg) if msg == "email already in use"));
    assert_eq!(inner.len().await, 1);
}

#[tokio::test]
async fn store_constraint_catches_lost_race_on_update() {
    let inner = Arc::new(InMemoryAuthorRepository::new());
    let seeded = seed_authors(&inner, &["Ada", "Bob"]).await;
    let service = AuthorService::new(
        Arc::new(StaleLookup(inner.clone())),
        Arc::new(InMemoryPostRepository::new()),
    );

    let err = service
        .update(UpdateAuthorInput {
            id: seeded[1].id.to_string(),
            name: None,
            email: Some(seeded[0].email.clone()),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
}
