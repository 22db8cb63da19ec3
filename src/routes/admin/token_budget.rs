use axum::{Json, extract::State};
use axum_valid::Valid;
use serde::Serialize;

use super::error::AdminError;
use crate::{AppState, models::TokenBudgetSettings};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Fetch the current token budget settings.
#[tracing::instrument(name = "admin.token_budget.get", skip(state))]
pub async fn get_token_budget_settings(
    State(state): State<AppState>,
) -> Result<Json<TokenBudgetSettings>, AdminError> {
    let settings = state.services.token_budget.get_settings().await?;
    Ok(Json(settings))
}

/// Replace the token budget settings.
#[tracing::instrument(name = "admin.token_budget.update", skip(state, input))]
pub async fn update_token_budget_settings(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<TokenBudgetSettings>>,
) -> Result<Json<MessageResponse>, AdminError> {
    state.services.token_budget.update_settings(&input).await?;
    Ok(Json(MessageResponse {
        message: "Token budget settings updated".to_string(),
    }))
}
