//! # Batch Issuance Coordinator
//!
//! Issues one credential per document for a single worker. Each document is
//! an independent attempt: normalize, build, issue, persist. An attempt that
//! fails at any stage becomes a failure entry in the report; it never aborts
//! its siblings.
//!
//! ## Concurrency
//!
//! Attempts run as separate tokio tasks. An optional bound limits how many
//! issuer calls are in flight at once. The report is assembled only after
//! every attempt has settled, and each outcome lands in the slot of its
//! input position, so the failure list follows input order.
//!
//! ## Orphans
//!
//! A credential minted by the issuer but not recorded locally is counted as
//! a failure. Its entry carries `orphanedCredentialId` and an `error`-level
//! event is logged so an operator can reconcile it by hand.
//!
//! Nothing is deduplicated or retried: submitting the same documents twice
//! mints two sets of credentials.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Semaphore;
use uuid::Uuid;

use gigid_core::{build, normalize, DocumentKind, GovernmentDocument, SchemaDescriptor, ValidationError};
use gigid_issuer_client::{IssuanceError, VerifiableCredential};

use crate::issuer::CredentialIssuer;
use crate::records::WorkerRecord;
use crate::store::{CredentialStore, StoreError};

/// Errors that abort a whole batch before any attempt starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// The worker has no DID address to bind credentials to.
    #[error("worker {worker_id} has no DID address")]
    WorkerNotAddressable { worker_id: String },
}

/// Why a single document failed.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", issuer_reason(.0))]
    Issuance(#[from] IssuanceError),
    /// Issued at the issuer but not recorded locally.
    #[error("credential {credential_id} issued but not recorded: {source}")]
    Store {
        credential_id: String,
        #[source]
        source: StoreError,
    },
    /// The attempt's task panicked or was cancelled.
    #[error("issuance attempt aborted: {0}")]
    Aborted(String),
}

fn issuer_reason(err: &IssuanceError) -> String {
    err.message()
}

impl ItemError {
    /// Credential id left without a local record, if any.
    pub fn orphaned_credential_id(&self) -> Option<&str> {
        match self {
            Self::Store { credential_id, .. } => Some(credential_id),
            _ => None,
        }
    }
}

/// One failed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub document_id: String,
    pub document_type: DocumentKind,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphaned_credential_id: Option<String>,
}

/// One successfully issued and recorded credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCredential {
    pub document_id: String,
    pub document_type: DocumentKind,
    pub credential_id: String,
    /// Internal id of the stored credential record.
    pub record_id: Uuid,
}

/// Outcome of a batch.
///
/// `success_count + failure_count == total` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchIssuanceReport {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// Failures in input order.
    pub failures: Vec<BatchFailure>,
    /// Successes in input order.
    pub issued: Vec<IssuedCredential>,
}

impl BatchIssuanceReport {
    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }
}

/// Drives batches of issuance attempts against an issuer and a store.
#[derive(Debug)]
pub struct BatchCoordinator<I, S> {
    issuer: Arc<I>,
    store: Arc<S>,
    schema: Arc<SchemaDescriptor>,
    max_concurrency: Option<usize>,
}

impl<I, S> Clone for BatchCoordinator<I, S> {
    fn clone(&self) -> Self {
        Self {
            issuer: Arc::clone(&self.issuer),
            store: Arc::clone(&self.store),
            schema: Arc::clone(&self.schema),
            max_concurrency: self.max_concurrency,
        }
    }
}

impl<I: CredentialIssuer, S: CredentialStore> BatchCoordinator<I, S> {
    /// Create a coordinator with unbounded concurrency.
    pub fn new(issuer: Arc<I>, store: Arc<S>, schema: SchemaDescriptor) -> Self {
        Self {
            issuer,
            store,
            schema: Arc::new(schema),
            max_concurrency: None,
        }
    }

    /// Bound the number of in-flight issuer calls. Zero is treated as one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    /// Issue one credential per document for `worker`.
    ///
    /// # Errors
    ///
    /// [`BatchError::WorkerNotAddressable`] if the worker has no DID address.
    /// Per-document failures are reported in the returned report instead.
    pub async fn issue_batch(
        &self,
        worker: &WorkerRecord,
        documents: Vec<GovernmentDocument>,
    ) -> Result<BatchIssuanceReport, BatchError> {
        let total = documents.len();
        if total == 0 {
            tracing::info!(worker_id = %worker.worker_id, "empty batch, nothing to issue");
            return Ok(BatchIssuanceReport::default());
        }

        let address = worker
            .holder_address()
            .ok_or_else(|| BatchError::WorkerNotAddressable {
                worker_id: worker.worker_id.to_string(),
            })?
            .to_string();

        tracing::info!(worker_id = %worker.worker_id, total, "starting issuance batch");

        let limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let worker = Arc::new(worker.clone());
        let address: Arc<str> = Arc::from(address);

        let mut pending = Vec::with_capacity(total);
        for doc in documents {
            let label = (doc.id.clone(), doc.document_type.clone());
            let issuer = Arc::clone(&self.issuer);
            let store = Arc::clone(&self.store);
            let schema = Arc::clone(&self.schema);
            let worker = Arc::clone(&worker);
            let address = Arc::clone(&address);
            let limiter = limiter.clone();

            let handle = tokio::spawn(async move {
                // Held until the attempt finishes; the semaphore is never closed.
                let _permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                attempt(&*issuer, &*store, &schema, &worker, &address, doc).await
            });
            pending.push((label, handle));
        }

        let mut report = BatchIssuanceReport {
            total,
            ..BatchIssuanceReport::default()
        };

        for ((document_id, document_type), handle) in pending {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(ItemError::Aborted(join_err.to_string())),
            };
            match outcome {
                Ok(issued) => {
                    tracing::info!(
                        worker_id = %worker.worker_id,
                        document_id = %issued.document_id,
                        document_type = %issued.document_type,
                        credential_id = %issued.credential_id,
                        "credential issued and recorded"
                    );
                    report.issued.push(issued);
                }
                Err(err) => {
                    let orphaned = err.orphaned_credential_id().map(str::to_string);
                    if let Some(credential_id) = &orphaned {
                        tracing::error!(
                            worker_id = %worker.worker_id,
                            document_id = %document_id,
                            credential_id = %credential_id,
                            error = %err,
                            "credential issued but not recorded; reconcile manually"
                        );
                    } else {
                        tracing::warn!(
                            worker_id = %worker.worker_id,
                            document_id = %document_id,
                            document_type = %document_type,
                            error = %err,
                            "document issuance failed"
                        );
                    }
                    report.failures.push(BatchFailure {
                        document_id,
                        document_type,
                        error: err.to_string(),
                        orphaned_credential_id: orphaned,
                    });
                }
            }
        }

        report.success_count = report.issued.len();
        report.failure_count = report.failures.len();

        tracing::info!(
            worker_id = %worker.worker_id,
            total = report.total,
            success_count = report.success_count,
            failure_count = report.failure_count,
            "issuance batch complete"
        );
        Ok(report)
    }
}

async fn attempt<I: CredentialIssuer, S: CredentialStore>(
    issuer: &I,
    store: &S,
    schema: &SchemaDescriptor,
    worker: &WorkerRecord,
    address: &str,
    doc: GovernmentDocument,
) -> Result<IssuedCredential, ItemError> {
    let normalized = normalize(&doc)?;
    let request = build(&normalized, address, schema)?;
    let result = issuer.issue(&request).await?;

    let vc = result
        .vc
        .map(VerifiableCredential::into_value)
        .unwrap_or_else(|| Value::Object(Map::new()));

    let record = store
        .create_credential(
            worker,
            &result.credential_id,
            normalized.kind.as_str(),
            vc.to_string(),
        )
        .await
        .map_err(|source| ItemError::Store {
            credential_id: result.credential_id.clone(),
            source,
        })?;

    Ok(IssuedCredential {
        document_id: doc.id,
        document_type: doc.document_type,
        credential_id: result.credential_id,
        record_id: record.id,
    })
}
