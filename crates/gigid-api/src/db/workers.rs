//! Worker persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `workers` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gigid_core::WorkerId;
use gigid_issuance::{BackgroundCheckStatus, Mnemonic, VerificationLevel, WorkerRecord};

/// Insert a new worker record.
pub async fn insert(pool: &PgPool, record: &WorkerRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO workers (id, worker_id, full_name, email, phone_number, skills,
         home_geo_location, work_geo_location, city, state, country, platform,
         service_type, license_number, vehicle_type, profile_id, address, public_key,
         mnemonic, verification_level, background_check_status, is_active,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                 $16, $17, $18, $19, $20, $21, $22, $23, $24)",
    )
    .bind(record.id)
    .bind(record.worker_id.as_str())
    .bind(&record.full_name)
    .bind(&record.email)
    .bind(&record.phone_number)
    .bind(&record.skills)
    .bind(&record.home_geo_location)
    .bind(&record.work_geo_location)
    .bind(&record.city)
    .bind(&record.state)
    .bind(&record.country)
    .bind(&record.platform)
    .bind(&record.service_type)
    .bind(&record.license_number)
    .bind(&record.vehicle_type)
    .bind(&record.profile_id)
    .bind(&record.address)
    .bind(&record.public_key)
    .bind(record.mnemonic.as_ref().map(Mnemonic::expose))
    .bind(record.verification_level.as_str())
    .bind(record.background_check_status.as_str())
    .bind(record.is_active)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all workers from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<WorkerRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, WorkerRow>(
        "SELECT id, worker_id, full_name, email, phone_number, skills,
         home_geo_location, work_geo_location, city, state, country, platform,
         service_type, license_number, vehicle_type, profile_id, address, public_key,
         mnemonic, verification_level, background_check_status, is_active,
         created_at, updated_at
         FROM workers ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(WorkerRow::into_record).collect()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct WorkerRow {
    id: Uuid,
    worker_id: String,
    full_name: String,
    email: String,
    phone_number: String,
    skills: Vec<String>,
    home_geo_location: Option<String>,
    work_geo_location: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: String,
    platform: Option<String>,
    service_type: Option<String>,
    license_number: Option<String>,
    vehicle_type: Option<String>,
    profile_id: Option<String>,
    address: Option<String>,
    public_key: Option<String>,
    mnemonic: Option<String>,
    verification_level: String,
    background_check_status: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkerRow {
    fn into_record(self) -> Result<WorkerRecord, sqlx::Error> {
        let worker_id = WorkerId::new(self.worker_id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(WorkerRecord {
            id: self.id,
            worker_id,
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone_number,
            skills: self.skills,
            home_geo_location: self.home_geo_location,
            work_geo_location: self.work_geo_location,
            city: self.city,
            state: self.state,
            country: self.country,
            platform: self.platform,
            service_type: self.service_type,
            license_number: self.license_number,
            vehicle_type: self.vehicle_type,
            profile_id: self.profile_id,
            address: self.address,
            public_key: self.public_key,
            mnemonic: self.mnemonic.map(Mnemonic::new),
            verification_level: VerificationLevel::from_label(&self.verification_level),
            background_check_status: BackgroundCheckStatus::from_label(
                &self.background_check_status,
            ),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
