use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::DocumentRepo,
    },
    models::Document,
};

pub struct SqliteDocumentRepo {
    pool: SqlitePool,
}

impl SqliteDocumentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn document_from_row(row: &sqlx::sqlite::SqliteRow) -> Document {
        Document {
            id: row.get("id"),
            semantic_id: row.get("semantic_id"),
            link: row.get("link"),
            boost: row.get("boost"),
            hidden: row.get("hidden"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl DocumentRepo for SqliteDocumentRepo {
    async fn ranked_by_boost(&self, ascending: bool, limit: i64) -> DbResult<Vec<Document>> {
        let order = if ascending { "ASC" } else { "DESC" };
        let query = format!(
            r#"
            SELECT id, semantic_id, link, boost, hidden, created_at, updated_at
            FROM documents
            ORDER BY boost {}, id ASC
            LIMIT ?
            "#,
            order
        );

        let rows = sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::document_from_row).collect())
    }

    async fn update_boost(&self, document_id: &str, boost: i64) -> DbResult<Document> {
        let row = sqlx::query(
            r#"
            UPDATE documents
            SET boost = ?, updated_at = datetime('now')
            WHERE id = ?
            RETURNING id, semantic_id, link, boost, hidden, created_at, updated_at
            "#,
        )
        .bind(boost)
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::document_from_row(&r))
            .ok_or(DbError::NotFound)
    }

    async fn update_hidden(&self, document_id: &str, hidden: bool) -> DbResult<Document> {
        let row = sqlx::query(
            r#"
            UPDATE documents
            SET hidden = ?, updated_at = datetime('now')
            WHERE id = ?
            RETURNING id, semantic_id, link, boost, hidden, created_at, updated_at
            "#,
        )
        .bind(hidden)
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::document_from_row(&r))
            .ok_or(DbError::NotFound)
    }
}
