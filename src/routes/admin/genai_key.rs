use axum::{extract::State, http::StatusCode};

use super::error::AdminError;
use crate::AppState;

/// Validate the configured generative-model API key, subject to the
/// cooldown gate.
#[tracing::instrument(name = "admin.genai_key.validate", skip(state))]
pub async fn validate_genai_key(State(state): State<AppState>) -> Result<StatusCode, AdminError> {
    state.services.genai_key.validate_key().await?;
    Ok(StatusCode::NO_CONTENT)
}
