//! Admin management endpoints, mounted under `/manage/admin` behind the
//! admin authentication middleware.

mod deletion;
mod doc_boosts;
mod error;
mod genai_key;
mod token_budget;
mod users;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

pub use error::{AdminError, ErrorResponse};

use crate::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/doc-boosts",
            get(doc_boosts::list_boosted_docs).post(doc_boosts::update_boost),
        )
        .route("/doc-hidden", post(doc_boosts::update_hidden))
        .route("/genai-api-key/validate", get(genai_key::validate_genai_key))
        .route("/deletion-attempt", post(deletion::create_deletion_attempt))
        .route(
            "/token-budget-settings",
            get(token_budget::get_token_budget_settings)
                .put(token_budget::update_token_budget_settings),
        )
        .route("/users", put(users::bulk_invite_users))
        .route("/remove-invited-user", patch(users::remove_invited_user))
        .route("/deactivate-user", patch(users::deactivate_user))
        .route("/activate-user", patch(users::activate_user))
}
