use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::{
        dto::{AccountResponse, UpdateAccountRequest},
        services::{get_account, update_account},
    },
    auth::jwt::AuthUser,
    error::{with_deadline, AppError},
    state::AppState,
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(put_me))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<AccountResponse>, AppError> {
    let account = with_deadline(
        state.config.request_timeout,
        get_account(state.accounts.as_ref(), account_id),
    )
    .await?;
    Ok(Json(account.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<StatusCode, AppError> {
    with_deadline(
        state.config.request_timeout,
        update_account(state.accounts.as_ref(), account_id, payload.into()),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
