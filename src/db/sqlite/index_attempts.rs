use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::common::parse_index_status;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::IndexAttemptRepo,
    },
    models::IndexAttempt,
};

pub struct SqliteIndexAttemptRepo {
    pool: SqlitePool,
}

impl SqliteIndexAttemptRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn attempt_from_row(row: &sqlx::sqlite::SqliteRow) -> DbResult<IndexAttempt> {
        Ok(IndexAttempt {
            id: row.get("id"),
            connector_id: row.get("connector_id"),
            credential_id: row.get("credential_id"),
            status: parse_index_status(&row.get::<String, _>("status"))?,
            targets_secondary: row.get("targets_secondary"),
            error_msg: row.get("error_msg"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl IndexAttemptRepo for SqliteIndexAttemptRepo {
    async fn create(
        &self,
        connector_id: i64,
        credential_id: i64,
        targets_secondary: bool,
    ) -> DbResult<IndexAttempt> {
        let row = sqlx::query(
            r#"
            INSERT INTO index_attempts (connector_id, credential_id, targets_secondary)
            VALUES (?, ?, ?)
            RETURNING id, connector_id, credential_id, status, targets_secondary,
                      error_msg, created_at, updated_at
            "#,
        )
        .bind(connector_id)
        .bind(credential_id)
        .bind(targets_secondary)
        .fetch_one(&self.pool)
        .await?;

        Self::attempt_from_row(&row)
    }

    async fn get(&self, id: i64) -> DbResult<Option<IndexAttempt>> {
        let row = sqlx::query(
            r#"
            SELECT id, connector_id, credential_id, status, targets_secondary,
                   error_msg, created_at, updated_at
            FROM index_attempts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::attempt_from_row).transpose()
    }

    async fn mark_in_progress(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE index_attempts
            SET status = 'in_progress', updated_at = datetime('now')
            WHERE id = ? AND status = 'not_started'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn cancel_for_connector(
        &self,
        connector_id: i64,
        include_secondary: bool,
    ) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE index_attempts
            SET status = 'canceled', updated_at = datetime('now')
            WHERE connector_id = ?
              AND status IN ('not_started', 'in_progress')
              AND (targets_secondary = 0 OR ?)
            "#,
        )
        .bind(connector_id)
        .bind(include_secondary)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn in_progress_exists(&self, connector_id: i64, credential_id: i64) -> DbResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS cnt
            FROM index_attempts
            WHERE connector_id = ? AND credential_id = ? AND status = 'in_progress'
            "#,
        )
        .bind(connector_id)
        .bind(credential_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("cnt") > 0)
    }

    async fn delete_for_pair(&self, connector_id: i64, credential_id: i64) -> DbResult<u64> {
        let result =
            sqlx::query("DELETE FROM index_attempts WHERE connector_id = ? AND credential_id = ?")
                .bind(connector_id)
                .bind(credential_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
