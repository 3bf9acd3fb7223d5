use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    accounts::services::register as register_account,
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        jwt::JwtKeys,
        password::verify_password,
    },
    error::{with_deadline, AppError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<RegisterResponse>), AppError> {
    let account = with_deadline(
        state.config.request_timeout,
        register_account(state.accounts.as_ref(), state.clock.as_ref(), payload.into()),
    )
    .await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static("/api/v1/me"));

    Ok((
        StatusCode::CREATED,
        headers,
        Json(RegisterResponse {
            id: account.id,
            username: account.username,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = payload.username.trim();
    let account = with_deadline(state.config.request_timeout, async {
        state.accounts.find_by_username(username).await.map_err(AppError::from)
    })
    .await?;

    let Some(account) = account else {
        warn!(%username, "login for unknown username");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(&payload.password, &account.password_hash)? {
        warn!(account_id = %account.id, "login with invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let access_token = JwtKeys::from_ref(&state).sign(account.id)?;

    info!(account_id = %account.id, "account logged in");
    Ok(Json(LoginResponse {
        access_token,
        user: RegisterResponse {
            id: account.id,
            username: account.username,
        },
    }))
}
