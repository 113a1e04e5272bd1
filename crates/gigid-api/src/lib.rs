//! # gigid-api -- Axum HTTP service for gigid
//!
//! Exposes worker onboarding, batch credential issuance and public credential
//! verification over HTTP. The service sits between the gig platform and the
//! DID/VC issuer:
//!
//! ```text
//! client ──HTTP──▶ gigid-api ──▶ BatchCoordinator ──▶ issuer (POST /cred)
//!                      │                  │
//!                      └──── PersistentStore (memory + optional Postgres)
//! ```
//!
//! ## Route Structure
//!
//! | Prefix | Module |
//! |--------|--------|
//! | `/v1/workers/*` | [`routes::workers`] |
//! | `/v1/credentials/*` | [`routes::credentials`] |
//! | `/v1/stats` | [`routes::stats`] |
//! | `/openapi.json` | [`openapi`] |
//! | `/health/*` | liveness and readiness checks |
//!
//! Issuer-dependent routes answer 503 when the issuer is not configured;
//! everything else keeps working against the local store.

pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::workers::router())
        .merge(routes::credentials::router())
        .merge(routes::stats::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness check: the process is up.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: 200 "ready", or 503 when the database is unreachable.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.store.ping().await {
        tracing::warn!("Database health check failed: {e}");
        return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}


#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    async fn get_text(path: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let resp = app(AppState::new()).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_endpoints_answer() {
        assert_eq!(get_text("/health/liveness").await, (StatusCode::OK, "ok".into()));
        assert_eq!(
            get_text("/health/readiness").await,
            (StatusCode::OK, "ready".into())
        );
    }

    #[tokio::test]
    async fn openapi_is_served() {
        let (status, body) = get_text("/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/v1/workers"));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (status, _) = get_text("/v1/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
