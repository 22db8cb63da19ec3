//! Admission control for connector/credential pair deletion.
//!
//! Deleting a pair tears down state across the relational store, the
//! search index, and (for file connectors) the file store, so a request
//! only gets admitted once the pair is verifiably quiescent: scheduled
//! indexing work is cancelled first, then the admission policy inspects
//! the settled state. Admitted deletions enqueue an asynchronous cleanup
//! job; only the connector-file reaping runs inline, because the file
//! listing lives in connector config that the cleanup job will delete.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    db::{ConnectorPairRepo, DbError, DbResult, DeletionAttemptRepo, IndexAttemptRepo},
    files::{FileStore, FileStoreError},
    models::{ConnectorCredentialPair, DocumentSource},
    queue::{CleanupTask, QueueError, TaskQueue},
};

#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AdmissionDenied(String),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Cleanup job submission failed: {0}")]
    Queue(#[from] QueueError),

    #[error("Connector file deletion failed: {0}")]
    FileStore(#[from] FileStoreError),
}

/// Whether a deletion may proceed given current system state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    Admitted,
    Denied(String),
}

/// Policy deciding whether a pair deletion is currently safe.
#[async_trait]
pub trait DeletionPolicy: Send + Sync {
    async fn evaluate(&self, pair: &ConnectorCredentialPair) -> DbResult<AdmissionDecision>;
}

/// Database-backed admission policy: a pair is deletable once its
/// connector is paused, nothing is actively indexing it, and no earlier
/// deletion is still being processed.
pub struct DbDeletionPolicy {
    index_attempts: Arc<dyn IndexAttemptRepo>,
    deletion_attempts: Arc<dyn DeletionAttemptRepo>,
}

impl DbDeletionPolicy {
    pub fn new(
        index_attempts: Arc<dyn IndexAttemptRepo>,
        deletion_attempts: Arc<dyn DeletionAttemptRepo>,
    ) -> Self {
        Self {
            index_attempts,
            deletion_attempts,
        }
    }
}

#[async_trait]
impl DeletionPolicy for DbDeletionPolicy {
    async fn evaluate(&self, pair: &ConnectorCredentialPair) -> DbResult<AdmissionDecision> {
        let connector_id = pair.connector.id;
        let credential_id = pair.credential_id;

        if !pair.connector.disabled {
            return Ok(AdmissionDecision::Denied(
                "Connector must be paused before it can be deleted".to_string(),
            ));
        }

        if self
            .index_attempts
            .in_progress_exists(connector_id, credential_id)
            .await?
        {
            return Ok(AdmissionDecision::Denied(
                "An indexing attempt for this connector is still in progress".to_string(),
            ));
        }

        if self
            .deletion_attempts
            .active_exists(connector_id, credential_id)
            .await?
        {
            return Ok(AdmissionDecision::Denied(
                "A deletion attempt for this connector is already in progress".to_string(),
            ));
        }

        Ok(AdmissionDecision::Admitted)
    }
}

#[derive(Clone)]
pub struct DeletionService {
    pairs: Arc<dyn ConnectorPairRepo>,
    index_attempts: Arc<dyn IndexAttemptRepo>,
    policy: Arc<dyn DeletionPolicy>,
    queue: Arc<dyn TaskQueue>,
    file_store: Arc<dyn FileStore>,
}

impl DeletionService {
    pub fn new(
        pairs: Arc<dyn ConnectorPairRepo>,
        index_attempts: Arc<dyn IndexAttemptRepo>,
        policy: Arc<dyn DeletionPolicy>,
        queue: Arc<dyn TaskQueue>,
        file_store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            pairs,
            index_attempts,
            policy,
            queue,
            file_store,
        }
    }

    /// Admit and kick off deletion of a connector/credential pair.
    #[tracing::instrument(skip(self))]
    pub async fn request_deletion(
        &self,
        connector_id: i64,
        credential_id: i64,
    ) -> Result<(), DeletionError> {
        let pair = self
            .pairs
            .get(connector_id, credential_id)
            .await?
            .ok_or_else(|| {
                DeletionError::NotFound(format!(
                    "Connector with ID '{}' and credential ID '{}' does not exist. \
                     Has it already been deleted?",
                    connector_id, credential_id
                ))
            })?;

        // Cancel scheduled and running indexing work before consulting the
        // policy, so it reasons over a settled state and no freshly claimed
        // attempt can start after admission. Cancellation is idempotent and
        // stays in effect even if admission is denied.
        let cancelled = self
            .index_attempts
            .cancel_for_connector(connector_id, true)
            .await?;
        if cancelled > 0 {
            tracing::info!(connector_id, cancelled, "Cancelled indexing attempts");
        }

        match self.policy.evaluate(&pair).await? {
            AdmissionDecision::Admitted => {}
            AdmissionDecision::Denied(reason) => {
                tracing::info!(connector_id, credential_id, %reason, "Deletion denied");
                return Err(DeletionError::AdmissionDenied(reason));
            }
        }

        self.queue
            .submit(CleanupTask {
                connector_id,
                credential_id,
            })
            .await?;

        // File connectors keep uploaded content in the file store, and the
        // location list lives only in the connector config the cleanup job
        // is about to reap. Delete those inline while we still hold them.
        if pair.connector.source == DocumentSource::File {
            for location in pair.connector.file_locations() {
                tracing::debug!(
                    location,
                    backend = self.file_store.backend_name(),
                    "Deleting connector file"
                );
                self.file_store.delete_file(&location).await?;
            }
        }

        tracing::info!(connector_id, credential_id, "Deletion attempt admitted");
        Ok(())
    }
}
