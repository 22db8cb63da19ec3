use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A document row as tracked by the relational store. The search index
/// holds the content; this side carries ranking metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub semantic_id: String,
    pub link: Option<String>,
    pub boost: i64,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A document as surfaced by the boost-management admin endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct BoostDoc {
    pub document_id: String,
    pub semantic_id: String,
    pub link: String,
    pub boost: i64,
    pub hidden: bool,
}

/// Request to change a document's ranking boost.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BoostUpdateRequest {
    #[validate(length(min = 1))]
    pub document_id: String,
    pub boost: i64,
}

/// Request to hide or unhide a document from search results.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HiddenUpdateRequest {
    #[validate(length(min = 1))]
    pub document_id: String,
    pub hidden: bool,
}
