//! # Write-Through Store
//!
//! [`PersistentStore`] serves all reads from an in-memory [`MemoryStore`].
//! Writes go to Postgres first when a pool is configured, and only reach
//! memory once the row is durable. At startup the memory side is hydrated
//! from the database.

use sqlx::PgPool;
use uuid::Uuid;

use gigid_issuance::{
    CredentialRecord, CredentialStore, MemoryStore, StoreError, WorkerRecord, WorkerStats,
};

use crate::db;

#[derive(Debug, Clone, Default)]
pub struct PersistentStore {
    memory: MemoryStore,
    pool: Option<PgPool>,
}

impl PersistentStore {
    /// A store with no database behind it.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A store that writes through to `pool`.
    pub fn with_pool(pool: Option<PgPool>) -> Self {
        Self {
            memory: MemoryStore::new(),
            pool,
        }
    }

    pub fn is_durable(&self) -> bool {
        self.pool.is_some()
    }

    /// Round-trip to the database, if there is one.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    /// Load workers and credentials from the database into memory.
    ///
    /// Returns the number of workers and credentials loaded.
    pub async fn hydrate(&self) -> Result<(usize, usize), sqlx::Error> {
        let Some(pool) = &self.pool else {
            return Ok((0, 0));
        };

        let workers = db::workers::load_all(pool).await?;
        let worker_count = workers.len();
        for record in workers {
            self.memory.put_worker(record);
        }

        let credentials = db::credentials::load_all(pool).await?;
        let credential_count = credentials.len();
        for record in credentials {
            self.memory.put_credential(record);
        }

        tracing::info!(
            workers = worker_count,
            credentials = credential_count,
            "hydrated in-memory store from database"
        );
        Ok((worker_count, credential_count))
    }
}

impl CredentialStore for PersistentStore {
    async fn create_credential(
        &self,
        worker: &WorkerRecord,
        credential_id: &str,
        document_kind: &str,
        serialized_vc: String,
    ) -> Result<CredentialRecord, StoreError> {
        let Some(pool) = &self.pool else {
            return self
                .memory
                .create_credential(worker, credential_id, document_kind, serialized_vc)
                .await;
        };

        let record =
            self.memory
                .prepare_credential(worker, credential_id, document_kind, serialized_vc)?;
        db::credentials::insert(pool, &record)
            .await
            .map_err(db::store_error)?;
        self.memory.put_credential(record.clone());
        Ok(record)
    }

    async fn find_worker_by_external_id(
        &self,
        worker_id: &str,
    ) -> Result<Option<WorkerRecord>, StoreError> {
        self.memory.find_worker_by_external_id(worker_id).await
    }

    async fn list_credentials_for_worker(
        &self,
        worker: Uuid,
    ) -> Result<Vec<CredentialRecord>, StoreError> {
        self.memory.list_credentials_for_worker(worker).await
    }

    async fn create_worker(&self, worker: WorkerRecord) -> Result<WorkerRecord, StoreError> {
        let Some(pool) = &self.pool else {
            return self.memory.create_worker(worker).await;
        };

        self.memory.check_new_worker(&worker)?;
        db::workers::insert(pool, &worker)
            .await
            .map_err(db::store_error)?;
        self.memory.put_worker(worker.clone());
        Ok(worker)
    }

    async fn list_workers(&self) -> Result<Vec<WorkerRecord>, StoreError> {
        self.memory.list_workers().await
    }

    async fn worker_stats(&self) -> Result<WorkerStats, StoreError> {
        self.memory.worker_stats().await
    }
}
