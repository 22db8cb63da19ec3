use async_trait::async_trait;

use crate::{db::error::DbResult, models::Document};

#[async_trait]
pub trait DocumentRepo: Send + Sync {
    /// Documents ordered by boost. `ascending = false` surfaces the most
    /// boosted documents first.
    async fn ranked_by_boost(&self, ascending: bool, limit: i64) -> DbResult<Vec<Document>>;

    /// Set a document's boost, returning the updated row.
    /// Fails with `DbError::NotFound` for unknown documents.
    async fn update_boost(&self, document_id: &str, boost: i64) -> DbResult<Document>;

    /// Set a document's hidden flag, returning the updated row.
    /// Fails with `DbError::NotFound` for unknown documents.
    async fn update_hidden(&self, document_id: &str, hidden: bool) -> DbResult<Document>;
}
