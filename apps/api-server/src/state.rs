//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{AuthorRepository, PostRepository};
use quill_core::{AuthorService, PostService};
use quill_infra::database::DatabaseConfig;
use quill_infra::{InMemoryAuthorRepository, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use quill_infra::{DatabaseConnections, PostgresAuthorRepository, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authors: AuthorService,
    pub posts: PostService,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, preferring PostgreSQL when configured.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match connect(config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let mut state = Self::with_repos(
                            Arc::new(PostgresAuthorRepository::new(conn.main.clone())),
                            Arc::new(PostgresPostRepository::new(conn.main.clone())),
                        );
                        state.db = Some(conn);
                        tracing::info!("Application state initialized (postgres)");
                        return state;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to prepare database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory()
    }

    /// State backed by the in-memory record store.
    pub fn in_memory() -> Self {
        Self::with_repos(
            Arc::new(InMemoryAuthorRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }

    fn with_repos(
        author_repo: Arc<dyn AuthorRepository>,
        post_repo: Arc<dyn PostRepository>,
    ) -> Self {
        let authors = AuthorService::new(author_repo, post_repo.clone());
        let posts = PostService::new(post_repo, authors.clone());
        Self {
            authors,
            posts,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

/// Open the pool and bring the schema up to date.
#[cfg(feature = "postgres")]
async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnections, migration::DbErr> {
    use migration::{Migrator, MigratorTrait};

    let connections = DatabaseConnections::init(config).await?;
    Migrator::up(&connections.main, None).await?;
    tracing::info!("Database migrations applied");
    Ok(connections)
}
