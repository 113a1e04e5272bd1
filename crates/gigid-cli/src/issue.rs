//! # Issue Subcommand
//!
//! Issues one credential per document for a single DID address, using the
//! same batch coordinator as the API service. Issued credentials are
//! recorded in a throwaway in-memory store; the report printed to stdout is
//! the durable output.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use gigid_core::{GovernmentDocument, SchemaDescriptor, WorkerId};
use gigid_issuance::{
    BatchCoordinator, BatchIssuanceReport, CredentialIssuer, CredentialStore, MemoryStore,
    NewWorker, WorkerRecord,
};

use crate::{issuer_from_env, load_documents, load_schema, runtime};

/// Arguments for `gigid issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// JSON file with the documents (array, or `{"documents": [...]}`).
    #[arg(long, value_name = "FILE")]
    pub documents: PathBuf,
    /// DID address to bind the credentials to.
    #[arg(long, value_name = "DID")]
    pub address: String,
    /// Platform worker id to record. Generated when omitted.
    #[arg(long, value_name = "ID")]
    pub worker_id: Option<String>,
    /// Worker's full name.
    #[arg(long)]
    pub name: Option<String>,
    /// Credential schema override.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
    /// Upper bound on concurrent issuer calls.
    #[arg(long, default_value_t = 8)]
    pub max_concurrency: usize,
}

/// Execute the issue subcommand.
pub fn run_issue(args: &IssueArgs) -> Result<u8> {
    let documents = load_documents(&args.documents)?;
    let schema = load_schema(args.schema.as_deref())?;
    let worker = cli_worker(args)?;
    let issuer = issuer_from_env()?;

    let report = runtime()?.block_on(issue_documents(
        issuer,
        worker,
        documents,
        schema,
        args.max_concurrency,
    ))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.has_failures() {
        return Ok(2);
    }
    Ok(0)
}

/// The worker a CLI batch is issued for.
pub fn cli_worker(args: &IssueArgs) -> Result<WorkerRecord> {
    let mut worker = WorkerRecord::without_profile(NewWorker {
        full_name: args.name.clone().unwrap_or_default(),
        ..NewWorker::default()
    });
    if let Some(id) = &args.worker_id {
        worker.worker_id = WorkerId::new(id.as_str()).context("invalid --worker-id")?;
    }
    worker.address = Some(args.address.clone());
    Ok(worker)
}

/// Record `worker` in a fresh in-memory store and issue `documents` for it.
pub async fn issue_documents<I: CredentialIssuer>(
    issuer: I,
    worker: WorkerRecord,
    documents: Vec<GovernmentDocument>,
    schema: SchemaDescriptor,
    max_concurrency: usize,
) -> Result<BatchIssuanceReport> {
    let store = Arc::new(MemoryStore::new());
    let worker = store
        .create_worker(worker)
        .await
        .context("failed to record worker")?;

    let coordinator = BatchCoordinator::new(Arc::new(issuer), store, schema)
        .with_max_concurrency(max_concurrency);
    let report = coordinator.issue_batch(&worker, documents).await?;

    tracing::info!(
        worker_id = %worker.worker_id,
        success = report.success_count,
        failed = report.failure_count,
        "batch complete"
    );
    Ok(report)
}
