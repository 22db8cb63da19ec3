use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::{
    DeletionError, DocumentError, GateError, TokenBudgetError, UserServiceError,
};

/// Error body returned by admin endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AdminError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<DocumentError> for AdminError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) => AdminError::BadRequest(err.to_string()),
            DocumentError::Db(e) => {
                tracing::error!(error = %e, "Database error");
                AdminError::Internal("An internal error occurred".to_string())
            }
            DocumentError::Index(e) => {
                tracing::error!(error = %e, "Index update error");
                AdminError::Internal("An internal error occurred".to_string())
            }
        }
    }
}

impl From<GateError> for AdminError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::NotConfigured => AdminError::NotFound(err.to_string()),
            GateError::ValidationFailed(msg) => AdminError::BadRequest(msg),
            GateError::Kv(e) => {
                tracing::error!(error = %e, "Config store error");
                AdminError::Internal("An internal error occurred".to_string())
            }
        }
    }
}

impl From<DeletionError> for AdminError {
    fn from(err: DeletionError) -> Self {
        match err {
            DeletionError::NotFound(msg) => AdminError::NotFound(msg),
            DeletionError::AdmissionDenied(msg) => AdminError::BadRequest(msg),
            DeletionError::Db(e) => {
                tracing::error!(error = %e, "Database error");
                AdminError::Internal("An internal error occurred".to_string())
            }
            DeletionError::Queue(e) => {
                tracing::error!(error = %e, "Cleanup job submission failed");
                AdminError::Internal("An internal error occurred".to_string())
            }
            DeletionError::FileStore(e) => {
                tracing::error!(error = %e, "Connector file deletion failed");
                AdminError::Internal("An internal error occurred".to_string())
            }
        }
    }
}

impl From<TokenBudgetError> for AdminError {
    fn from(err: TokenBudgetError) -> Self {
        match err {
            TokenBudgetError::GloballyDisabled => AdminError::BadRequest(err.to_string()),
            TokenBudgetError::NotFound => AdminError::NotFound(err.to_string()),
            TokenBudgetError::Corrupt(e) => {
                tracing::error!(error = %e, "Token budget settings corrupt");
                AdminError::Internal("An internal error occurred".to_string())
            }
            TokenBudgetError::Kv(e) => {
                tracing::error!(error = %e, "Config store error");
                AdminError::Internal("An internal error occurred".to_string())
            }
        }
    }
}

impl From<UserServiceError> for AdminError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::NotFound => AdminError::NotFound(err.to_string()),
            UserServiceError::Invalid(msg) => AdminError::BadRequest(msg),
            UserServiceError::Db(e) => {
                tracing::error!(error = %e, "Database error");
                AdminError::Internal("An internal error occurred".to_string())
            }
            UserServiceError::Kv(e) => {
                tracing::error!(error = %e, "Config store error");
                AdminError::Internal("An internal error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AdminError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AdminError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AdminError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
