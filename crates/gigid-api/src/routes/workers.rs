//! # Worker Routes
//!
//! Onboarding and credential issuance for gig workers.
//!
//! Onboarding mints a DID profile at the issuer and records the worker with
//! the profile's address. Credentials are issued in a separate step: the
//! client posts the worker's government documents and the batch coordinator
//! issues one credential per document, reporting failures per item.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use gigid_core::{DocumentKind, GovernmentDocument};
use gigid_issuance::{
    BatchIssuanceReport, CredentialRecord, CredentialStore, NewWorker, WorkerRecord,
};
use gigid_issuer_client::DidProfile;

use super::{require_coordinator, require_issuer};
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json};
use crate::state::{AppConfig, AppState};

/// Build the worker router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/workers", post(create_worker).get(list_workers))
        .route("/v1/workers/:worker_id", get(get_worker))
        .route("/v1/workers/:worker_id/credentials", post(issue_credentials))
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Response to a successful onboarding.
///
/// The profile carries the DID recovery mnemonic. This is the only response
/// that ever contains it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkerResponse {
    pub success: bool,
    pub worker: WorkerRecord,
    pub profile: DidProfile,
    pub message: String,
}

/// A worker together with the credentials issued to it.
#[derive(Debug, Serialize)]
pub struct WorkerDetailResponse {
    pub worker: WorkerRecord,
    pub credentials: Vec<CredentialView>,
}

/// A locally recorded credential as shown to API clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialView {
    pub id: Uuid,
    /// Issuer-assigned credential identifier.
    pub credential_id: String,
    pub document_kind: String,
    /// Human-readable name of the document kind.
    pub document_label: String,
    /// The issuer's VC document.
    pub vc: serde_json::Value,
    /// Public link at which the credential can be verified.
    pub verification_url: String,
    pub created_at: DateTime<Utc>,
}

impl CredentialView {
    fn from_record(record: CredentialRecord, config: &AppConfig) -> Self {
        let vc = serde_json::from_str(&record.vc)
            .unwrap_or_else(|_| serde_json::Value::String(record.vc.clone()));
        Self {
            verification_url: config.verification_url(&record.credential_id),
            document_label: DocumentKind::from(record.document_kind.as_str())
                .display_label()
                .to_string(),
            id: record.id,
            credential_id: record.credential_id,
            document_kind: record.document_kind,
            vc,
            created_at: record.created_at,
        }
    }
}

/// Documents to issue credentials for.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueCredentialsRequest {
    #[schema(value_type = Vec<Object>)]
    pub documents: Vec<GovernmentDocument>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/workers: Onboard a worker and mint their DID.
#[utoipa::path(
    post,
    path = "/v1/workers",
    request_body = Object,
    responses(
        (status = 201, description = "Worker created with a DID profile"),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "fullName, email or phoneNumber missing"),
        (status = 502, description = "Issuer failed to create the DID profile"),
        (status = 503, description = "Issuer client not configured"),
    ),
    tag = "workers"
)]
async fn create_worker(
    State(state): State<AppState>,
    body: Result<Json<NewWorker>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateWorkerResponse>), AppError> {
    let input = extract_validated_json(body)?;
    let issuer = require_issuer(&state)?;

    let profile = issuer.profiles().create().await?;
    let worker = state
        .store
        .create_worker(WorkerRecord::onboard(input, &profile))
        .await?;

    tracing::info!(
        worker_id = %worker.worker_id,
        address = %profile.address,
        "worker onboarded"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateWorkerResponse {
            success: true,
            worker,
            profile,
            message: "Worker created successfully with DID".into(),
        }),
    ))
}

/// GET /v1/workers: List workers, newest first.
#[utoipa::path(
    get,
    path = "/v1/workers",
    responses((status = 200, description = "All workers, newest first")),
    tag = "workers"
)]
async fn list_workers(State(state): State<AppState>) -> Result<Json<Vec<WorkerRecord>>, AppError> {
    Ok(Json(state.store.list_workers().await?))
}

/// GET /v1/workers/{worker_id}: A worker and their credentials.
#[utoipa::path(
    get,
    path = "/v1/workers/{worker_id}",
    params(("worker_id" = String, Path, description = "Platform worker id (GW...)")),
    responses(
        (status = 200, description = "Worker with issued credentials"),
        (status = 404, description = "Unknown worker", body = crate::error::ErrorBody),
    ),
    tag = "workers"
)]
async fn get_worker(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> Result<Json<WorkerDetailResponse>, AppError> {
    let worker = state
        .store
        .find_worker_by_external_id(&worker_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("worker {worker_id}")))?;

    let credentials = state
        .store
        .list_credentials_for_worker(worker.id)
        .await?
        .into_iter()
        .map(|record| CredentialView::from_record(record, &state.config))
        .collect();

    Ok(Json(WorkerDetailResponse {
        worker,
        credentials,
    }))
}

/// POST /v1/workers/{worker_id}/credentials: Issue one credential per document.
///
/// Per-document failures do not fail the request; they are listed in the
/// report in input order.
#[utoipa::path(
    post,
    path = "/v1/workers/{worker_id}/credentials",
    params(("worker_id" = String, Path, description = "Platform worker id (GW...)")),
    request_body = IssueCredentialsRequest,
    responses(
        (status = 200, description = "Batch issuance report"),
        (status = 400, description = "Malformed JSON body"),
        (status = 404, description = "Unknown worker"),
        (status = 422, description = "Worker has no DID address"),
        (status = 503, description = "Issuer client not configured"),
    ),
    tag = "workers"
)]
async fn issue_credentials(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
    body: Result<Json<IssueCredentialsRequest>, JsonRejection>,
) -> Result<Json<BatchIssuanceReport>, AppError> {
    let req = extract_json(body)?;
    let coordinator = require_coordinator(&state)?;

    let worker = state
        .store
        .find_worker_by_external_id(&worker_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("worker {worker_id}")))?;

    let report = coordinator.issue_batch(&worker, req.documents).await?;
    Ok(Json(report))
}
