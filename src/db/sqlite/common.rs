use uuid::Uuid;

use crate::{
    db::error::{DbError, DbResult},
    models::{DocumentSource, IndexAttemptStatus, UserRole},
};

/// Parse a UUID string from the database, returning a DbError on failure
pub fn parse_uuid(s: &str) -> DbResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DbError::Internal(format!("Invalid UUID in database: {}", e)))
}

pub fn parse_source(s: &str) -> DbResult<DocumentSource> {
    DocumentSource::from_str(s)
        .ok_or_else(|| DbError::Internal(format!("Invalid document source in database: {}", s)))
}

pub fn parse_index_status(s: &str) -> DbResult<IndexAttemptStatus> {
    IndexAttemptStatus::from_str(s)
        .ok_or_else(|| DbError::Internal(format!("Invalid index attempt status in database: {}", s)))
}

pub fn parse_role(s: &str) -> DbResult<UserRole> {
    UserRole::from_str(s)
        .ok_or_else(|| DbError::Internal(format!("Invalid user role in database: {}", s)))
}
