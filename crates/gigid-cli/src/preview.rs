//! # Preview Subcommand
//!
//! Runs the pure half of the pipeline (normalize, then build) over a
//! documents file and prints the request bodies the issuer would receive.
//! Nothing is sent.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use gigid_core::{
    build, normalize, CredentialIssuanceRequest, DocumentKind, GovernmentDocument,
    SchemaDescriptor,
};

use crate::{load_documents, load_schema};

/// Arguments for `gigid preview`.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// JSON file with the documents (array, or `{"documents": [...]}`).
    #[arg(long, value_name = "FILE")]
    pub documents: PathBuf,
    /// DID address the credentials would be bound to.
    #[arg(long, value_name = "DID")]
    pub address: String,
    /// Credential schema override.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

/// The outcome of previewing one document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewItem {
    pub document_id: String,
    pub document_type: DocumentKind,
    /// Name shown to operators.
    pub document_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<CredentialIssuanceRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Execute the preview subcommand.
pub fn run_preview(args: &PreviewArgs) -> Result<u8> {
    let documents = load_documents(&args.documents)?;
    let schema = load_schema(args.schema.as_deref())?;

    let items = preview_documents(&documents, &args.address, &schema);
    println!("{}", serde_json::to_string_pretty(&items)?);

    let invalid = items.iter().filter(|item| item.error.is_some()).count();
    if invalid > 0 {
        tracing::warn!(invalid, total = items.len(), "some documents are invalid");
        return Ok(2);
    }
    Ok(0)
}

/// Build the issuer payload for every document, in input order.
pub fn preview_documents(
    documents: &[GovernmentDocument],
    address: &str,
    schema: &SchemaDescriptor,
) -> Vec<PreviewItem> {
    documents
        .iter()
        .map(|doc| {
            let outcome = normalize(doc).and_then(|normalized| build(&normalized, address, schema));
            let (request, error) = match outcome {
                Ok(request) => (Some(request), None),
                Err(e) => (None, Some(e.to_string())),
            };
            PreviewItem {
                document_id: doc.id.clone(),
                document_type: doc.document_type.clone(),
                document_name: doc.display_name().to_string(),
                request,
                error,
            }
        })
        .collect()
}
