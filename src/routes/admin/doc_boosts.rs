use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use axum_valid::Valid;
use serde::Deserialize;

use super::error::AdminError;
use crate::{
    AppState,
    models::{BoostDoc, BoostUpdateRequest, HiddenUpdateRequest},
};

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct BoostRankingQuery {
    #[serde(default)]
    pub ascending: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// List documents ordered by boost.
#[tracing::instrument(name = "admin.doc_boosts.list", skip(state))]
pub async fn list_boosted_docs(
    State(state): State<AppState>,
    Query(query): Query<BoostRankingQuery>,
) -> Result<Json<Vec<BoostDoc>>, AdminError> {
    let docs = state
        .services
        .documents
        .ranked_by_boost(query.ascending, query.limit)
        .await?;
    Ok(Json(docs))
}

/// Set a document's boost.
#[tracing::instrument(name = "admin.doc_boosts.update", skip(state, input))]
pub async fn update_boost(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<BoostUpdateRequest>>,
) -> Result<StatusCode, AdminError> {
    state
        .services
        .documents
        .update_boost(&input.document_id, input.boost)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Hide or unhide a document.
#[tracing::instrument(name = "admin.doc_hidden.update", skip(state, input))]
pub async fn update_hidden(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<HiddenUpdateRequest>>,
) -> Result<StatusCode, AdminError> {
    state
        .services
        .documents
        .update_hidden(&input.document_id, input.hidden)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
