//! Client for the document index's management API.
//!
//! Metadata updates (boost, hidden) fan out to the serving index and, when
//! an embedding model swap is underway, to the rebuild-in-progress
//! secondary index so the swap does not lose admin edits.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::IndexConfig;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Index rejected update for document '{document_id}': {status}")]
    Rejected {
        document_id: String,
        status: reqwest::StatusCode,
    },
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Partial update of a document's index-side metadata.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IndexUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Apply a metadata update to a document in every active index.
    async fn update(&self, document_id: &str, update: IndexUpdate) -> IndexResult<()>;

    /// Purge all documents ingested through a connector/credential pair
    /// from every active index. Returns the number of documents removed.
    async fn delete_for_pair(&self, connector_id: i64, credential_id: i64) -> IndexResult<u64>;
}

/// HTTP implementation against the index's document management API.
pub struct HttpDocumentIndex {
    client: reqwest::Client,
    base_url: String,
    primary: String,
    secondary: Option<String>,
}

impl HttpDocumentIndex {
    pub fn new(client: reqwest::Client, config: &IndexConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            primary: config.primary_index.clone(),
            secondary: config.secondary_index.clone(),
        }
    }

    fn index_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.secondary.as_deref())
    }
}

#[derive(Serialize)]
struct DeleteByPairRequest {
    connector_id: i64,
    credential_id: i64,
}

#[derive(serde::Deserialize)]
struct DeleteByPairResponse {
    deleted: u64,
}

#[async_trait]
impl DocumentIndex for HttpDocumentIndex {
    #[tracing::instrument(skip(self), fields(document_id))]
    async fn update(&self, document_id: &str, update: IndexUpdate) -> IndexResult<()> {
        for index in self.index_names() {
            let url = format!(
                "{}/api/v1/indexes/{}/documents/{}/fields",
                self.base_url, index, document_id
            );
            let response = self.client.post(&url).json(&update).send().await?;
            if !response.status().is_success() {
                return Err(IndexError::Rejected {
                    document_id: document_id.to_string(),
                    status: response.status(),
                });
            }
            tracing::debug!(index, document_id, "Applied index metadata update");
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_for_pair(&self, connector_id: i64, credential_id: i64) -> IndexResult<u64> {
        let mut total = 0u64;
        for index in self.index_names() {
            let url = format!(
                "{}/api/v1/indexes/{}/documents/delete-by-pair",
                self.base_url, index
            );
            let response = self
                .client
                .post(&url)
                .json(&DeleteByPairRequest {
                    connector_id,
                    credential_id,
                })
                .send()
                .await?
                .error_for_status()?;

            let body: DeleteByPairResponse = response.json().await?;
            total += body.deleted;
        }
        Ok(total)
    }
}
