//! Dashboard counters.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use gigid_issuance::{CredentialStore, WorkerStats};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/stats", get(worker_stats))
}

/// GET /v1/stats: Worker totals by verification state.
#[utoipa::path(
    get,
    path = "/v1/stats",
    responses((status = 200, description = "Total, verified, pending and active worker counts")),
    tag = "stats"
)]
async fn worker_stats(State(state): State<AppState>) -> Result<Json<WorkerStats>, AppError> {
    Ok(Json(state.store.worker_stats().await?))
}
