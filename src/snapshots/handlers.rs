use axum::{
    extract::{FromRef, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    snapshots::{
        dto::{SnapshotDetailsResponse, SnapshotResponse},
        services::SnapshotEngine,
    },
    state::AppState,
};

pub fn snapshot_routes() -> Router<AppState> {
    Router::new()
        .route("/snapshots", post(create_snapshot))
        .route("/snapshots/:id", get(get_snapshot))
}

#[instrument(skip(state))]
pub async fn create_snapshot(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<(StatusCode, HeaderMap, Json<SnapshotResponse>), AppError> {
    let snapshot = SnapshotEngine::from_ref(&state).generate(account_id).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/snapshots/{}", snapshot.id)) {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(snapshot.into())))
}

#[instrument(skip(state))]
pub async fn get_snapshot(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(snapshot_id): Path<Uuid>,
) -> Result<Json<SnapshotDetailsResponse>, AppError> {
    let resolved = SnapshotEngine::from_ref(&state)
        .lookup(account_id, snapshot_id)
        .await?;
    Ok(Json(resolved.into()))
}
