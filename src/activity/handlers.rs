use axum::{extract::State, routing::put, Json, Router};
use tracing::instrument;

use crate::{
    activity::{
        dto::{ActivityResponse, RecordStepsRequest},
        services::record_steps,
    },
    auth::jwt::AuthUser,
    error::{with_deadline, AppError},
    state::AppState,
};

pub fn activity_routes() -> Router<AppState> {
    Router::new().route("/activity", put(put_activity))
}

#[instrument(skip(state, payload))]
pub async fn put_activity(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<RecordStepsRequest>,
) -> Result<Json<ActivityResponse>, AppError> {
    let record = with_deadline(
        state.config.request_timeout,
        record_steps(
            state.accounts.as_ref(),
            state.activities.as_ref(),
            state.clock.as_ref(),
            account_id,
            payload.date,
            payload.steps,
        ),
    )
    .await?;
    Ok(Json(record.into()))
}
