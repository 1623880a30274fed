//! Application state - shared across all handlers.

use std::sync::Arc;

use bloghub_core::ports::{CategoryRepository, ImageStore, PostRepository};
use bloghub_core::{CategoryService, PostService};
use bloghub_infra::{DatabaseConnections, InMemoryRepository, LocalImageStore};

#[cfg(feature = "postgres")]
use bloghub_infra::{PostgresCategoryRepository, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub posts: PostService,
    pub images: Arc<dyn ImageStore>,
    pub default_author_id: String,
    pub db: Option<Arc<DatabaseConnections>>,
}

type Repositories = (
    Option<Arc<DatabaseConnections>>,
    Arc<dyn CategoryRepository>,
    Arc<dyn PostRepository>,
);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (db, category_repo, post_repo) = repositories(config).await;
        let images = image_store(config);

        tracing::info!(
            persistent = db.is_some(),
            default_author = %config.default_author_id,
            "Application state initialized"
        );

        let state =
            Self::from_parts(category_repo, post_repo, images, config.default_author_id.clone(), db);

        if config.seed_data {
            match bloghub_core::seed_sample_data(&state.categories, &state.posts).await {
                Ok(Some(report)) => tracing::info!(?report, "Seeded sample data"),
                Ok(None) => {}
                Err(e) => tracing::error!("Seeding sample data failed: {}", e),
            }
        }

        state
    }

    pub fn from_parts(
        category_repo: Arc<dyn CategoryRepository>,
        post_repo: Arc<dyn PostRepository>,
        images: Arc<dyn ImageStore>,
        default_author_id: String,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        Self {
            categories: CategoryService::new(category_repo),
            posts: PostService::new(post_repo),
            images,
            default_author_id,
            db,
        }
    }

    /// Close the database pool, if any.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
        }
    }
}

fn in_memory() -> Repositories {
    let repo = Arc::new(InMemoryRepository::new());
    let categories: Arc<dyn CategoryRepository> = repo.clone();
    let posts: Arc<dyn PostRepository> = repo;
    (None, categories, posts)
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> Repositories {
    use migration::MigratorTrait;

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    let connections = match DatabaseConnections::init(db_config).await {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return in_memory();
        }
    };

    if config.run_migrations {
        if let Err(e) = migration::Migrator::up(connections.main.as_ref(), None).await {
            tracing::error!("Migrations failed: {}. Using in-memory fallback.", e);
            connections.close().await;
            return in_memory();
        }
        tracing::info!("Migrations applied");
    }

    let categories: Arc<dyn CategoryRepository> =
        Arc::new(PostgresCategoryRepository::new(connections.main.clone()));
    let posts: Arc<dyn PostRepository> =
        Arc::new(PostgresPostRepository::new(connections.main.clone()));
    (Some(Arc::new(connections)), categories, posts)
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_config: &AppConfig) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory()
}

fn image_store(config: &AppConfig) -> Arc<dyn ImageStore> {
    #[cfg(feature = "blob")]
    if let Some(blob_config) = &config.blob_store {
        match bloghub_infra::BlobImageStore::new(blob_config.clone()) {
            Ok(store) => {
                tracing::info!(base_url = %blob_config.base_url, "Using blob image store");
                return Arc::new(store);
            }
            Err(e) => tracing::error!("Blob store unavailable: {}. Using local uploads.", e),
        }
    }

    tracing::info!(dir = %config.local_store.dir.display(), "Using local image store");
    Arc::new(LocalImageStore::new(config.local_store.clone()))
}
