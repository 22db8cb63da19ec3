//! Connector cleanup worker for admitted deletion requests.
//!
//! For each task pulled off the queue the worker:
//! 1. Records a deletion attempt row, which the admission policy uses to
//!    reject concurrent deletions of the same pair
//! 2. Purges the pair's documents from every active search index
//! 3. Drops the pair's index attempt history
//! 4. Removes the pair row itself
//! 5. Marks the deletion attempt succeeded or failed
//!
//! Steps are ordered so a crash mid-run leaves the pair present and the
//! attempt in progress; the operator can retry once the stale attempt is
//! resolved. Failures are recorded on the attempt row and never kill the
//! worker loop.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    db::{DbError, DbPool},
    index::{DocumentIndex, IndexError},
    models::DeletionAttemptStatus,
    queue::CleanupTask,
};

/// Results from cleaning up a single pair.
#[derive(Debug, Default)]
pub struct CleanupRunResult {
    /// Documents purged from the search indexes.
    pub documents_deleted: u64,
    /// Index attempt rows dropped.
    pub index_attempts_deleted: u64,
}

#[derive(Debug, thiserror::Error)]
enum CleanupError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("{0}")]
    Index(#[from] IndexError),
}

/// Runs the connector cleanup worker until the queue's sending side closes.
pub async fn start_connector_cleanup_worker(
    db: Arc<DbPool>,
    index: Arc<dyn DocumentIndex>,
    mut rx: mpsc::Receiver<CleanupTask>,
) {
    tracing::info!("Starting connector cleanup worker");

    while let Some(task) = rx.recv().await {
        let connector_id = task.connector_id;
        let credential_id = task.credential_id;

        let attempt_id = match db.deletion_attempts().create(connector_id, credential_id).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    connector_id,
                    credential_id,
                    error = %e,
                    "Failed to record deletion attempt, skipping task"
                );
                continue;
            }
        };

        match run_cleanup(&db, &index, &task).await {
            Ok(result) => {
                if let Err(e) = db
                    .deletion_attempts()
                    .complete(attempt_id, DeletionAttemptStatus::Success, None)
                    .await
                {
                    tracing::error!(attempt_id, error = %e, "Failed to mark deletion attempt succeeded");
                }
                tracing::info!(
                    connector_id,
                    credential_id,
                    documents = result.documents_deleted,
                    index_attempts = result.index_attempts_deleted,
                    "Connector cleanup complete"
                );
            }
            Err(e) => {
                tracing::error!(
                    connector_id,
                    credential_id,
                    error = %e,
                    "Connector cleanup failed"
                );
                if let Err(e) = db
                    .deletion_attempts()
                    .complete(attempt_id, DeletionAttemptStatus::Failed, Some(&e.to_string()))
                    .await
                {
                    tracing::error!(attempt_id, error = %e, "Failed to mark deletion attempt failed");
                }
            }
        }
    }

    tracing::info!("Connector cleanup worker shutting down");
}

/// Clean up a single pair: index documents first, then database records.
async fn run_cleanup(
    db: &Arc<DbPool>,
    index: &Arc<dyn DocumentIndex>,
    task: &CleanupTask,
) -> Result<CleanupRunResult, CleanupError> {
    let mut result = CleanupRunResult::default();

    result.documents_deleted = index
        .delete_for_pair(task.connector_id, task.credential_id)
        .await?;
    tracing::debug!(
        connector_id = task.connector_id,
        documents = result.documents_deleted,
        "Purged pair documents from indexes"
    );

    result.index_attempts_deleted = db
        .index_attempts()
        .delete_for_pair(task.connector_id, task.credential_id)
        .await?;

    db.connector_pairs()
        .delete(task.connector_id, task.credential_id)
        .await?;

    Ok(result)
}
