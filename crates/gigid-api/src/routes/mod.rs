//! # API Route Modules
//!
//! - `workers`: onboarding (DID profile creation), listing, worker detail and
//!   batch credential issuance for a worker.
//! - `credentials`: public verification lookup of an issued credential.
//! - `stats`: dashboard counters.

pub mod credentials;
pub mod stats;
pub mod workers;

use gigid_issuer_client::IssuerClient;

use crate::error::AppError;
use crate::state::{AppState, Coordinator};

const ISSUER_NOT_CONFIGURED: &str =
    "Issuer client not configured. Set ISSUER_API_BASE_URL and ISSUER_BEARER_TOKEN.";

/// Extract the issuer client from AppState or return 503.
fn require_issuer(state: &AppState) -> Result<&IssuerClient, AppError> {
    state
        .issuer
        .as_deref()
        .ok_or_else(|| AppError::service_unavailable(ISSUER_NOT_CONFIGURED))
}

/// Extract the batch coordinator from AppState or return 503.
fn require_coordinator(state: &AppState) -> Result<&Coordinator, AppError> {
    state
        .coordinator
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable(ISSUER_NOT_CONFIGURED))
}
