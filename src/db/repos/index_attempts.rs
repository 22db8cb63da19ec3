use async_trait::async_trait;

use crate::{db::error::DbResult, models::IndexAttempt};

#[async_trait]
pub trait IndexAttemptRepo: Send + Sync {
    /// Schedule a new attempt in the `not_started` state.
    async fn create(
        &self,
        connector_id: i64,
        credential_id: i64,
        targets_secondary: bool,
    ) -> DbResult<IndexAttempt>;

    async fn get(&self, id: i64) -> DbResult<Option<IndexAttempt>>;

    /// Transition an attempt to `in_progress`. Called by the indexing
    /// workers when they claim scheduled work.
    async fn mark_in_progress(&self, id: i64) -> DbResult<()>;

    /// Cancel every pending or in-progress attempt for a connector.
    /// When `include_secondary` is set, attempts feeding the
    /// rebuild-in-progress index are cancelled as well. Returns the number
    /// of attempts cancelled.
    async fn cancel_for_connector(&self, connector_id: i64, include_secondary: bool)
    -> DbResult<u64>;

    /// Whether any attempt for the pair is currently `in_progress`.
    async fn in_progress_exists(&self, connector_id: i64, credential_id: i64) -> DbResult<bool>;

    /// Drop all attempt rows for a pair. Used by the cleanup worker once a
    /// deletion has been admitted.
    async fn delete_for_pair(&self, connector_id: i64, credential_id: i64) -> DbResult<u64>;
}
