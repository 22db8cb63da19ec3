use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_valid::Valid;

use super::error::AdminError;
use crate::{
    AppState,
    middleware::AdminAuth,
    models::{BulkInviteRequest, UserByEmail},
};

/// Invite users by email, returning the size of the invited set.
#[tracing::instrument(name = "admin.users.invite", skip(state, input))]
pub async fn bulk_invite_users(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<BulkInviteRequest>>,
) -> Result<Json<usize>, AdminError> {
    let count = state.services.users.bulk_invite(input.emails).await?;
    Ok(Json(count))
}

/// Remove an email from the invited set.
#[tracing::instrument(name = "admin.users.remove_invited", skip(state, input))]
pub async fn remove_invited_user(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<UserByEmail>>,
) -> Result<Json<usize>, AdminError> {
    let count = state.services.users.remove_invited(&input.user_email).await?;
    Ok(Json(count))
}

/// Deactivate a user account.
#[tracing::instrument(name = "admin.users.deactivate", skip(state, admin_auth, input))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(admin_auth): Extension<AdminAuth>,
    Valid(Json(input)): Valid<Json<UserByEmail>>,
) -> Result<StatusCode, AdminError> {
    state
        .services
        .users
        .deactivate(&input.user_email, admin_auth.email.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reactivate a user account.
#[tracing::instrument(name = "admin.users.activate", skip(state, input))]
pub async fn activate_user(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<UserByEmail>>,
) -> Result<StatusCode, AdminError> {
    state.services.users.activate(&input.user_email).await?;
    Ok(StatusCode::NO_CONTENT)
}
