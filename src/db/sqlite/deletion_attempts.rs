use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::DeletionAttemptRepo,
    },
    models::DeletionAttemptStatus,
};

pub struct SqliteDeletionAttemptRepo {
    pool: SqlitePool,
}

impl SqliteDeletionAttemptRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeletionAttemptRepo for SqliteDeletionAttemptRepo {
    async fn create(&self, connector_id: i64, credential_id: i64) -> DbResult<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO deletion_attempts (connector_id, credential_id)
            VALUES (?, ?)
            RETURNING id
            "#,
        )
        .bind(connector_id)
        .bind(credential_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn complete(
        &self,
        id: i64,
        status: DeletionAttemptStatus,
        error_msg: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE deletion_attempts
            SET status = ?, error_msg = ?, updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(error_msg)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn active_exists(&self, connector_id: i64, credential_id: i64) -> DbResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS cnt
            FROM deletion_attempts
            WHERE connector_id = ? AND credential_id = ? AND status = 'in_progress'
            "#,
        )
        .bind(connector_id)
        .bind(credential_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("cnt") > 0)
    }
}
