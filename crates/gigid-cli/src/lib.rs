//! # gigid-cli: Command-line access to the issuance pipeline
//!
//! Provides the `gigid` binary:
//!
//! - `gigid preview`: normalize documents and print the issuer payloads,
//!   without touching the network.
//! - `gigid issue`: issue a batch of credentials for one DID address.
//! - `gigid profile create`: mint a DID profile.
//! - `gigid credential get`: fetch an issued credential.
//!
//! Network commands read the issuer from `ISSUER_API_BASE_URL`,
//! `ISSUER_BEARER_TOKEN` and `ISSUER_TIMEOUT_SECS`.
//!
//! Every handler returns a process exit code: 0 on success, 1 when the
//! requested object does not exist, 2 when some documents failed.

pub mod credential;
pub mod issue;
pub mod preview;
pub mod profile;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use gigid_core::{GovernmentDocument, SchemaDescriptor};
use gigid_issuer_client::{IssuerClient, IssuerConfig};

/// A documents file: either a bare array or `{ "documents": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentsFile {
    List(Vec<GovernmentDocument>),
    Wrapped { documents: Vec<GovernmentDocument> },
}

/// Read government documents from a JSON file.
pub fn load_documents(path: &Path) -> Result<Vec<GovernmentDocument>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read documents file: {}", path.display()))?;
    let file: DocumentsFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse documents file: {}", path.display()))?;
    Ok(match file {
        DocumentsFile::List(documents) | DocumentsFile::Wrapped { documents } => documents,
    })
}

/// Load a credential schema override, or the built-in government-ID schema.
pub fn load_schema(path: Option<&Path>) -> Result<SchemaDescriptor> {
    let Some(path) = path else {
        return Ok(SchemaDescriptor::government_id());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file: {}", path.display()))?;
    SchemaDescriptor::from_json(&content)
        .with_context(|| format!("failed to parse schema file: {}", path.display()))
}

/// Build the issuer client from the environment.
fn issuer_from_env() -> Result<IssuerClient> {
    let config = IssuerConfig::from_env().context("issuer is not configured")?;
    tracing::debug!(base_url = %config.base_url, "using issuer");
    IssuerClient::new(config).context("failed to create issuer client")
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
