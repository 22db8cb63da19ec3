use axum::{Json, extract::State, http::StatusCode};

use super::error::AdminError;
use crate::{AppState, models::ConnectorCredentialPairIdentifier};

/// Request deletion of a connector/credential pair.
#[tracing::instrument(name = "admin.deletion.create", skip(state))]
pub async fn create_deletion_attempt(
    State(state): State<AppState>,
    Json(input): Json<ConnectorCredentialPairIdentifier>,
) -> Result<StatusCode, AdminError> {
    state
        .services
        .deletion
        .request_deletion(input.connector_id, input.credential_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
