//! # Quill Core
//!
//! The domain layer of the Quill blog API.
//! This crate contains the search/pagination rules, the uniqueness guard and
//! the author/post use cases, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod uniqueness;
pub mod usecases;

pub use error::{DomainError, RepoError};
pub use pagination::{Page, SearchParams, SearchQuery, SortDirection};
pub use usecases::{AuthorService, PostService};
