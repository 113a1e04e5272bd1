//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented routes into one OpenAPI document served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "gigid API",
        version = "0.3.0",
        description = "Worker onboarding with DID creation, batch issuance of government-ID verifiable credentials, and public credential verification.\n\nIssuer-dependent endpoints answer 503 when the issuer client is not configured. Health checks live under `/health/*`.",
        license(name = "BUSL-1.1")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // ── Workers ─────────────────────────────────────────────────────
        crate::routes::workers::create_worker,
        crate::routes::workers::list_workers,
        crate::routes::workers::get_worker,
        crate::routes::workers::issue_credentials,
        // ── Credentials ─────────────────────────────────────────────────
        crate::routes::credentials::verify_credential,
        // ── Stats ───────────────────────────────────────────────────────
        crate::routes::stats::worker_stats,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::routes::workers::CredentialView,
            crate::routes::workers::IssueCredentialsRequest,
        ),
    ),
    tags(
        (name = "workers", description = "Worker onboarding, DID minting and batch credential issuance"),
        (name = "credentials", description = "Public verification lookup of issued credentials"),
        (name = "stats", description = "Dashboard counters"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
