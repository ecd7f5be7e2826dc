//! In-memory record store - used when no database is configured, and in tests.
//!
//! Rows live in a `Vec` in insertion order behind an async `RwLock`. Sorting
//! is stable, so rows with equal sort keys keep their insertion order.
//! Unique columns are checked under the write lock, which makes the check
//! and the write a single atomic step.
//! Note: Data is lost on process restart.

mod author;
mod post;

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Author, Post, Record};
use quill_core::error::RepoError;
use quill_core::pagination::{SearchQuery, SortDirection, SortField};
use quill_core::ports::BaseRepository;

/// Entity-specific knowledge the in-memory store needs.
pub trait MemoryRecord: Record {
    type Field: SortField;

    /// Text matched by the listing filter.
    fn filter_text(&self) -> &str;

    fn compare_by(&self, other: &Self, field: Self::Field) -> Ordering;

    /// Unique columns as `(column, value)` pairs.
    fn unique_keys(&self) -> Vec<(&'static str, &str)>;
}

pub struct InMemoryRepository<T> {
    rows: RwLock<Vec<T>>,
}

/// In-memory author store.
pub type InMemoryAuthorRepository = InMemoryRepository<Author>;

/// In-memory post store.
pub type InMemoryPostRepository = InMemoryRepository<Post>;

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored rows, regardless of any filter.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MemoryRecord> InMemoryRepository<T> {
    /// Name of the first unique column `candidate` would collide on,
    /// ignoring the row at `skip`.
    fn taken_column(rows: &[T], candidate: &T, skip: Option<usize>) -> Option<&'static str> {
        let keys = candidate.unique_keys();
        rows.iter()
            .enumerate()
            .filter(|(pos, _)| Some(*pos) != skip)
            .find_map(|(_, row)| {
                let existing = row.unique_keys();
                keys.iter()
                    .find(|key| existing.contains(*key))
                    .map(|(column, _)| *column)
            })
    }
}

fn matches_filter<T: MemoryRecord>(row: &T, filter: Option<&str>) -> bool {
    match filter {
        Some(needle) => row
            .filter_text()
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl<T: MemoryRecord> BaseRepository<T, T::Field> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|row| row.id() == entity.id()) {
            return Err(RepoError::Constraint(format!(
                "{} {} already exists",
                T::ENTITY,
                entity.id()
            )));
        }
        if let Some(column) = Self::taken_column(&rows, &entity, None) {
            return Err(RepoError::UniqueViolation(column.to_string()));
        }

        rows.push(entity.clone());
        Ok(entity)
    }

    async fn replace(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;

        let pos = rows
            .iter()
            .position(|row| row.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        if let Some(column) = Self::taken_column(&rows, &entity, Some(pos)) {
            return Err(RepoError::UniqueViolation(column.to_string()));
        }

        rows[pos] = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        let pos = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or(RepoError::NotFound)?;
        Ok(rows.remove(pos))
    }

    async fn scan(&self, query: &SearchQuery<T::Field>) -> Result<Vec<T>, RepoError> {
        let rows = self.rows.read().await;

        let mut matched: Vec<&T> = rows
            .iter()
            .filter(|row| matches_filter(*row, query.filter.as_deref()))
            .collect();

        // sort_by is stable: equal keys stay in insertion order
        matched.sort_by(|a, b| {
            let ord = a.compare_by(b, query.sort);
            match query.sort_dir {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit()).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count(&self, filter: Option<&str>) -> Result<u64, RepoError> {
        let rows = self.rows.read().await;
        let total = rows.iter().filter(|row| matches_filter(*row, filter)).count();
        Ok(total as u64)
    }
}

/// Text ordering close to a locale collation: case-insensitive first, then
/// lowercase before uppercase at the first differing character.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| {
                x.is_uppercase()
                    .cmp(&y.is_uppercase())
                    .then_with(|| x.cmp(&y))
            })
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    })
}
