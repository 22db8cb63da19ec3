//! Generic key-value config store shared across the platform.
//!
//! Holds small bits of operational state that do not warrant their own
//! tables: the generative-model key-check timestamp, token budget
//! settings, and the invited-users list. A missing key is a normal
//! outcome (`Ok(None)`), not an error: several consumers treat "never
//! written" as a meaningful first-run state.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("KV store error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("KV value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KvResult<T> = Result<T, KvError>;

/// Well-known keys in the config store.
pub struct ConfigKeys;

impl ConfigKeys {
    /// Epoch seconds of the last successful generative-model key check.
    pub const GENAI_API_KEY_LAST_CHECK_TIME: &'static str = "genai_api_key_last_check_time";

    /// Serialized [`crate::models::TokenBudgetSettings`].
    pub const TOKEN_BUDGET_SETTINGS: &'static str = "token_budget_settings";

    /// JSON array of invited user emails.
    pub const INVITED_USERS: &'static str = "invited_users";
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Load a value, or `None` if the key has never been written.
    async fn load(&self, key: &str) -> KvResult<Option<serde_json::Value>>;

    /// Store a value, unconditionally overwriting any prior one.
    async fn store(&self, key: &str, value: &serde_json::Value) -> KvResult<()>;

    async fn delete(&self, key: &str) -> KvResult<()>;
}

/// SQLite-backed config store, sharing the management database.
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn load(&self, key: &str) -> KvResult<Option<serde_json::Value>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| serde_json::from_str(&r.get::<String, _>("value")))
            .transpose()
            .map_err(KvError::from)
    }

    async fn store(&self, key: &str, value: &serde_json::Value) -> KvResult<()> {
        let raw = serde_json::to_string(value)?;
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT (key) DO UPDATE
            SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
