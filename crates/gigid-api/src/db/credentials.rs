//! Credential persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `credentials` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gigid_issuance::CredentialRecord;

/// Insert a new credential record. `credential_id` is unique.
pub async fn insert(pool: &PgPool, record: &CredentialRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO credentials (id, credential_id, document_kind, vc, worker_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id)
    .bind(&record.credential_id)
    .bind(&record.document_kind)
    .bind(&record.vc)
    .bind(record.worker_id)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all credentials from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<CredentialRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CredentialRow>(
        "SELECT id, credential_id, document_kind, vc, worker_id, created_at
         FROM credentials ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CredentialRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    credential_id: String,
    document_kind: String,
    vc: String,
    worker_id: Uuid,
    created_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_record(self) -> CredentialRecord {
        CredentialRecord {
            id: self.id,
            credential_id: self.credential_id,
            document_kind: self.document_kind,
            vc: self.vc,
            worker_id: self.worker_id,
            created_at: self.created_at,
        }
    }
}
