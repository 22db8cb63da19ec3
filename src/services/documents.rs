use std::sync::Arc;

use thiserror::Error;

use crate::{
    db::{DbError, DbPool},
    index::{DocumentIndex, IndexError, IndexUpdate},
    models::BoostDoc,
};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No document found with ID '{0}'")]
    NotFound(String),

    #[error("Database error: {0}")]
    Db(DbError),

    #[error("Index update failed: {0}")]
    Index(#[from] IndexError),
}

impl From<DbError> for DocumentError {
    fn from(err: DbError) -> Self {
        DocumentError::Db(err)
    }
}

/// Ranking metadata management: boosting and hiding documents.
///
/// Updates are written to the relational store first (the source of
/// truth), then pushed to every active search index.
#[derive(Clone)]
pub struct DocumentService {
    db: Arc<DbPool>,
    index: Arc<dyn DocumentIndex>,
}

impl DocumentService {
    pub fn new(db: Arc<DbPool>, index: Arc<dyn DocumentIndex>) -> Self {
        Self { db, index }
    }

    pub async fn ranked_by_boost(
        &self,
        ascending: bool,
        limit: i64,
    ) -> Result<Vec<BoostDoc>, DocumentError> {
        let docs = self.db.documents().ranked_by_boost(ascending, limit).await?;
        Ok(docs
            .into_iter()
            .map(|doc| BoostDoc {
                document_id: doc.id,
                semantic_id: doc.semantic_id,
                link: doc.link.unwrap_or_default(),
                boost: doc.boost,
                hidden: doc.hidden,
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_boost(&self, document_id: &str, boost: i64) -> Result<(), DocumentError> {
        self.db
            .documents()
            .update_boost(document_id, boost)
            .await
            .map_err(|e| match e {
                DbError::NotFound => DocumentError::NotFound(document_id.to_string()),
                other => DocumentError::Db(other),
            })?;

        self.index
            .update(
                document_id,
                IndexUpdate {
                    boost: Some(boost),
                    hidden: None,
                },
            )
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_hidden(
        &self,
        document_id: &str,
        hidden: bool,
    ) -> Result<(), DocumentError> {
        self.db
            .documents()
            .update_hidden(document_id, hidden)
            .await
            .map_err(|e| match e {
                DbError::NotFound => DocumentError::NotFound(document_id.to_string()),
                other => DocumentError::Db(other),
            })?;

        self.index
            .update(
                document_id,
                IndexUpdate {
                    boost: None,
                    hidden: Some(hidden),
                },
            )
            .await?;
        Ok(())
    }
}
