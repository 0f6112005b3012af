//! Liveness and readiness probes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::app::AppState;

/// Liveness probe response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ts: DateTime<Utc>,
}

/// Readiness probe response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    pub ready: bool,
    pub ts: DateTime<Utc>,
    pub uptime_secs: i64,
}

/// Probe routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub(crate) async fn healthz() -> Json<HealthResponse> {
    let ts = Utc::now();
    tracing::debug!(target: "bedrock::health", ts = %ts, "healthz");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ts,
    })
}

/// Readiness probe.
///
/// The starter carries no optional backends, so readiness reduces to the
/// process being up; the uptime field makes restarts visible to probes.
#[utoipa::path(
    get,
    path = "/readyz",
    tag = "health",
    responses((status = 200, description = "Service is ready", body = ReadyResponse))
)]
pub(crate) async fn readyz(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let ts = Utc::now();
    let uptime_secs = (ts - state.started_at).num_seconds();
    tracing::debug!(target: "bedrock::health", ts = %ts, uptime_secs, "readyz");
    Json(ReadyResponse {
        ready: true,
        ts,
        uptime_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = Arc::new(AppState::new(Config::default()));
        router().with_state(state)
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readyz() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/readyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
