use async_trait::async_trait;

use crate::{db::error::DbResult, models::DeletionAttemptStatus};

/// Repository tracking connector cleanup runs, so the admission policy can
/// reject a second deletion while one is still being processed.
#[async_trait]
pub trait DeletionAttemptRepo: Send + Sync {
    /// Record the start of a cleanup run, returning the attempt id.
    async fn create(&self, connector_id: i64, credential_id: i64) -> DbResult<i64>;

    /// Record the terminal state of a cleanup run.
    async fn complete(
        &self,
        id: i64,
        status: DeletionAttemptStatus,
        error_msg: Option<&str>,
    ) -> DbResult<()>;

    /// Whether a cleanup run for the pair is still in progress.
    async fn active_exists(&self, connector_id: i64, credential_id: i64) -> DbResult<bool>;
}
