use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::{with_deadline, AppError},
    measurements::{
        dto::{MeasurementResponse, RecordMeasurementRequest},
        services::record_measurement,
    },
    state::AppState,
};

pub fn measurement_routes() -> Router<AppState> {
    Router::new().route("/measurements", post(create_measurement))
}

#[instrument(skip(state, payload))]
pub async fn create_measurement(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<RecordMeasurementRequest>,
) -> Result<(StatusCode, Json<MeasurementResponse>), AppError> {
    let saved = with_deadline(
        state.config.request_timeout,
        record_measurement(
            state.accounts.as_ref(),
            state.measurements.as_ref(),
            state.clock.as_ref(),
            account_id,
            payload.into(),
        ),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}
