mod error;
pub mod repos;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at startup.
struct CachedRepos {
    connector_pairs: Arc<dyn ConnectorPairRepo>,
    index_attempts: Arc<dyn IndexAttemptRepo>,
    deletion_attempts: Arc<dyn DeletionAttemptRepo>,
    documents: Arc<dyn DocumentRepo>,
    users: Arc<dyn UserRepo>,
}

/// SQLite-backed database pool.
///
/// Repositories are cached at construction time to avoid allocation on
/// each access.
pub struct DbPool {
    pool: sqlx::SqlitePool,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            connector_pairs: Arc::new(sqlite::SqliteConnectorPairRepo::new(pool.clone())),
            index_attempts: Arc::new(sqlite::SqliteIndexAttemptRepo::new(pool.clone())),
            deletion_attempts: Arc::new(sqlite::SqliteDeletionAttemptRepo::new(pool.clone())),
            documents: Arc::new(sqlite::SqliteDocumentRepo::new(pool.clone())),
            users: Arc::new(sqlite::SqliteUserRepo::new(pool.clone())),
        };
        DbPool { pool, repos }
    }

    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(
                sqlx::sqlite::SqliteConnectOptions::new()
                    .filename(&config.path)
                    .create_if_missing(config.create_if_missing),
            )
            .await?;
        Ok(Self::from_sqlite(pool))
    }

    /// Run pending migrations against the pool.
    pub async fn run_migrations(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations_sqlx/sqlite")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    /// Cheap connectivity probe for the health endpoint.
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn connector_pairs(&self) -> Arc<dyn ConnectorPairRepo> {
        self.repos.connector_pairs.clone()
    }

    pub fn index_attempts(&self) -> Arc<dyn IndexAttemptRepo> {
        self.repos.index_attempts.clone()
    }

    pub fn deletion_attempts(&self) -> Arc<dyn DeletionAttemptRepo> {
        self.repos.deletion_attempts.clone()
    }

    pub fn documents(&self) -> Arc<dyn DocumentRepo> {
        self.repos.documents.clone()
    }

    pub fn users(&self) -> Arc<dyn UserRepo> {
        self.repos.users.clone()
    }

    /// Direct pool access for components that manage their own tables
    /// (the KV config store).
    pub fn sqlite_pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}
