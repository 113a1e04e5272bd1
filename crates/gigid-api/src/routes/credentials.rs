//! # Credential Verification Route
//!
//! Public lookup of an issued credential. The document is fetched live from
//! the issuer, so it reflects the issuer's current view rather than the copy
//! recorded at issuance time.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Map, Value};

use super::require_issuer;
use crate::error::AppError;
use crate::state::AppState;

/// Build the credential verification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/credentials/:cred_id", get(verify_credential))
}

/// GET /v1/credentials/{cred_id}: Fetch a credential for verification.
///
/// Returns the issuer's document with `fetchedAt`, `isValid` and
/// `verificationUrl` added. `isValid` only records that the issuer answered
/// with the document; its own `result` field is passed through untouched.
#[utoipa::path(
    get,
    path = "/v1/credentials/{cred_id}",
    params(("cred_id" = String, Path, description = "Issuer-assigned credential id")),
    responses(
        (status = 200, description = "Credential document with verification metadata"),
        (status = 404, description = "The issuer does not know this credential"),
        (status = 502, description = "Issuer error"),
        (status = 503, description = "Issuer client not configured"),
    ),
    tag = "credentials"
)]
async fn verify_credential(
    State(state): State<AppState>,
    Path(cred_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let issuer = require_issuer(&state)?;

    let document = issuer
        .credentials()
        .get(&cred_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("credential {cred_id}")))?;

    let mut fields = match document {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("credential".into(), other);
            map
        }
    };

    fields.insert("fetchedAt".into(), Value::String(Utc::now().to_rfc3339()));
    fields.insert("isValid".into(), Value::Bool(true));
    fields.insert(
        "verificationUrl".into(),
        Value::String(state.config.verification_url(&cred_id)),
    );

    tracing::debug!(credential_id = %cred_id, "credential looked up");
    Ok(Json(Value::Object(fields)))
}
