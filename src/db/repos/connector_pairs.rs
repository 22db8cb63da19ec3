use async_trait::async_trait;

use crate::{db::error::DbResult, models::ConnectorCredentialPair};

/// Repository for connector/credential pairs.
///
/// Connector CRUD lives with the indexing pipeline; the management server
/// only looks pairs up and reaps them after cleanup.
#[async_trait]
pub trait ConnectorPairRepo: Send + Sync {
    /// Fetch a pair with its connector loaded, or None if the pair does
    /// not exist (or was already deleted).
    async fn get(
        &self,
        connector_id: i64,
        credential_id: i64,
    ) -> DbResult<Option<ConnectorCredentialPair>>;

    /// Remove the pair row. Idempotent: deleting an absent pair is a no-op.
    async fn delete(&self, connector_id: i64, credential_id: i64) -> DbResult<()>;
}
