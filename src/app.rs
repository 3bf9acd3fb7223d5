use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{accounts, activity, auth, measurements, snapshots};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(accounts::router())
                .merge(measurements::router())
                .merge(activity::router())
                .merge(snapshots::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use time::macros::datetime;
    use tower::ServiceExt;

    use super::*;
    use crate::memory::MemoryStore;

    fn app() -> Router {
        let store = Arc::new(MemoryStore::new());
        build_app(AppState::fake(store, datetime!(2024-03-10 09:30 UTC)))
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register_and_login(app: &Router, username: &str) -> String {
        let (status, _) = call(
            app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": username,
                "password": "correct-horse",
                "phone": "+15550001111",
                "height": "175",
                "weight": "72",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": username, "password": "correct-horse" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, _) = call(&app(), Method::GET, "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn snapshot_without_token_is_rejected() {
        let (status, _) = call(&app(), Method::POST, "/api/v1/snapshots", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let app = app();
        register_and_login(&app, "mei").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "mei",
                "password": "another-pass",
                "phone": "+15550002222",
                "height": "160",
                "weight": "55",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "username already exists");
    }

    #[tokio::test]
    async fn weight_with_three_decimals_is_rejected() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "mei",
                "password": "correct-horse",
                "phone": "+15550001111",
                "height": "170",
                "weight": "68.555",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "weight allows at most 2 decimal places");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = app();
        register_and_login(&app, "mei").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "mei", "password": "nope-nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn snapshot_flow_over_http() {
        let app = app();
        let token = register_and_login(&app, "mei").await;

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/measurements",
            Some(&token),
            Some(json!({ "weight": "80", "height": "180" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, activity) = call(
            &app,
            Method::PUT,
            "/api/v1/activity",
            Some(&token),
            Some(json!({ "steps": 8000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(activity["date"], "2024-03-10");

        let (status, snapshot) =
            call(&app, Method::POST, "/api/v1/snapshots", Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        // BMI comes from the account's stored height and weight.
        assert_eq!(snapshot["bmi"], "23.51");
        assert_eq!(snapshot["weight"], "72");
        assert_eq!(snapshot["steps"], 8000);
        assert!(snapshot["measurement_id"].is_string());

        let id = snapshot["snapshot_id"].as_str().unwrap();
        let (status, details) = call(
            &app,
            Method::GET,
            &format!("/api/v1/snapshots/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(details["snapshot_id"], id);
        assert_eq!(details["measurement"]["bmi"], "24.69");
        assert_eq!(details["activity"]["steps"], 8000);
    }

    #[tokio::test]
    async fn profile_update_changes_next_snapshot() {
        let app = app();
        let token = register_and_login(&app, "mei").await;

        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/v1/me",
            Some(&token),
            Some(json!({ "height": "0", "weight": "70" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, me) = call(&app, Method::GET, "/api/v1/me", Some(&token), None).await;
        assert_eq!(me["username"], "mei");
        assert_eq!(me["height"], "0");

        let (status, snapshot) =
            call(&app, Method::POST, "/api/v1/snapshots", Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(snapshot["bmi"], "0");
        assert_eq!(snapshot["steps"], 0);
        assert!(snapshot["measurement_id"].is_null());
    }

    #[tokio::test]
    async fn snapshots_of_other_accounts_are_not_found() {
        let app = app();
        let mei = register_and_login(&app, "mei").await;
        let jon = register_and_login(&app, "jon").await;

        let (_, snapshot) = call(&app, Method::POST, "/api/v1/snapshots", Some(&mei), None).await;
        let id = snapshot["snapshot_id"].as_str().unwrap();

        let (status, _) = call(
            &app,
            Method::GET,
            &format!("/api/v1/snapshots/{id}"),
            Some(&jon),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
