//! # Worker/Credential Store
//!
//! [`CredentialStore`] is the persistence seam used by the coordinator and
//! the onboarding service. [`MemoryStore`] is the in-process implementation
//! used by the CLI, tests, and the API when no database is configured.
//!
//! Locks are `parking_lot` and are never held across `.await` points.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::records::{CredentialRecord, WorkerRecord, WorkerStats};

/// Store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record with the same unique key already exists.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The backing database failed.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence operations for workers and their credentials.
pub trait CredentialStore: Send + Sync + 'static {
    /// Record a credential the issuer has just minted for `worker`.
    ///
    /// Fails with [`StoreError::Conflict`] if `credential_id` is already
    /// recorded.
    fn create_credential(
        &self,
        worker: &WorkerRecord,
        credential_id: &str,
        document_kind: &str,
        serialized_vc: String,
    ) -> impl Future<Output = Result<CredentialRecord, StoreError>> + Send;

    fn find_worker_by_external_id(
        &self,
        worker_id: &str,
    ) -> impl Future<Output = Result<Option<WorkerRecord>, StoreError>> + Send;

    fn list_credentials_for_worker(
        &self,
        worker: Uuid,
    ) -> impl Future<Output = Result<Vec<CredentialRecord>, StoreError>> + Send;

    /// Insert a new worker. Fails with [`StoreError::Conflict`] on a
    /// duplicate external id.
    fn create_worker(
        &self,
        worker: WorkerRecord,
    ) -> impl Future<Output = Result<WorkerRecord, StoreError>> + Send;

    /// All workers, newest first.
    fn list_workers(&self) -> impl Future<Output = Result<Vec<WorkerRecord>, StoreError>> + Send;

    fn worker_stats(&self) -> impl Future<Output = Result<WorkerStats, StoreError>> + Send;
}

/// Thread-safe, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    workers: Arc<RwLock<HashMap<Uuid, WorkerRecord>>>,
    credentials: Arc<RwLock<HashMap<Uuid, CredentialRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a worker without uniqueness checks. Used to hydrate
    /// from a durable store.
    pub fn put_worker(&self, worker: WorkerRecord) {
        self.workers.write().insert(worker.id, worker);
    }

    /// Insert or replace a credential without uniqueness checks.
    pub fn put_credential(&self, credential: CredentialRecord) {
        self.credentials.write().insert(credential.id, credential);
    }

    pub fn worker_count(&self) -> usize {
        self.workers.read().len()
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.read().len()
    }

    /// Validate and build a credential record without storing it.
    pub fn prepare_credential(
        &self,
        worker: &WorkerRecord,
        credential_id: &str,
        document_kind: &str,
        serialized_vc: String,
    ) -> Result<CredentialRecord, StoreError> {
        if !self.workers.read().contains_key(&worker.id) {
            return Err(StoreError::NotFound(format!("worker {}", worker.worker_id)));
        }
        if self
            .credentials
            .read()
            .values()
            .any(|c| c.credential_id == credential_id)
        {
            return Err(StoreError::Conflict(format!(
                "credential {credential_id} already recorded"
            )));
        }
        Ok(CredentialRecord {
            id: Uuid::new_v4(),
            credential_id: credential_id.to_string(),
            document_kind: document_kind.to_string(),
            vc: serialized_vc,
            worker_id: worker.id,
            created_at: Utc::now(),
        })
    }

    /// Fail with a conflict if `worker`'s external id is taken.
    pub fn check_new_worker(&self, worker: &WorkerRecord) -> Result<(), StoreError> {
        if self
            .workers
            .read()
            .values()
            .any(|w| w.worker_id == worker.worker_id || w.id == worker.id)
        {
            return Err(StoreError::Conflict(format!(
                "worker {} already exists",
                worker.worker_id
            )));
        }
        Ok(())
    }

    fn insert_credential_checked(&self, record: CredentialRecord) -> Result<CredentialRecord, StoreError> {
        let mut guard = self.credentials.write();
        if guard.values().any(|c| c.credential_id == record.credential_id) {
            return Err(StoreError::Conflict(format!(
                "credential {} already recorded",
                record.credential_id
            )));
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn insert_worker_checked(&self, worker: WorkerRecord) -> Result<WorkerRecord, StoreError> {
        let mut guard = self.workers.write();
        if guard
            .values()
            .any(|w| w.worker_id == worker.worker_id || w.id == worker.id)
        {
            return Err(StoreError::Conflict(format!(
                "worker {} already exists",
                worker.worker_id
            )));
        }
        guard.insert(worker.id, worker.clone());
        Ok(worker)
    }
}

impl CredentialStore for MemoryStore {
    async fn create_credential(
        &self,
        worker: &WorkerRecord,
        credential_id: &str,
        document_kind: &str,
        serialized_vc: String,
    ) -> Result<CredentialRecord, StoreError> {
        let record = self.prepare_credential(worker, credential_id, document_kind, serialized_vc)?;
        self.insert_credential_checked(record)
    }

    async fn find_worker_by_external_id(
        &self,
        worker_id: &str,
    ) -> Result<Option<WorkerRecord>, StoreError> {
        Ok(self
            .workers
            .read()
            .values()
            .find(|w| w.worker_id.as_str() == worker_id)
            .cloned())
    }

    async fn list_credentials_for_worker(
        &self,
        worker: Uuid,
    ) -> Result<Vec<CredentialRecord>, StoreError> {
        let mut creds: Vec<_> = self
            .credentials
            .read()
            .values()
            .filter(|c| c.worker_id == worker)
            .cloned()
            .collect();
        creds.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(creds)
    }

    async fn create_worker(&self, worker: WorkerRecord) -> Result<WorkerRecord, StoreError> {
        self.insert_worker_checked(worker)
    }

    async fn list_workers(&self) -> Result<Vec<WorkerRecord>, StoreError> {
        let mut workers: Vec<_> = self.workers.read().values().cloned().collect();
        workers.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.worker_id.as_str().cmp(a.worker_id.as_str()))
        });
        Ok(workers)
    }

    async fn worker_stats(&self) -> Result<WorkerStats, StoreError> {
        Ok(WorkerStats::tally(self.workers.read().values()))
    }
}
