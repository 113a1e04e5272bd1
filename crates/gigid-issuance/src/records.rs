//! # Worker and Credential Records
//!
//! Store-owned records. A [`WorkerRecord`] is keyed internally by UUID and
//! looked up by its external [`WorkerId`]; a [`CredentialRecord`] references
//! its owner by that internal UUID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use gigid_core::WorkerId;
use gigid_issuer_client::DidProfile;

const DEFAULT_COUNTRY: &str = "India";

/// Operator-assigned verification tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationLevel {
    #[default]
    Basic,
    Verified,
    Premium,
}

impl VerificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Verified => "verified",
            Self::Premium => "premium",
        }
    }

    /// Parse a stored label; unknown labels fall back to `basic`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "verified" => Self::Verified,
            "premium" => Self::Premium,
            _ => Self::Basic,
        }
    }
}

/// State of the worker's background check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundCheckStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl BackgroundCheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }

    /// Parse a stored label; unknown labels fall back to `pending`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "expired" => Self::Expired,
            _ => Self::Pending,
        }
    }
}

/// Recovery phrase of a worker's DID.
///
/// Kept so operators can hand the wallet over to the worker; never rendered
/// by `Debug` and never serialized into API responses.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(Zeroizing<String>);

impl Mnemonic {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(Zeroizing::new(phrase.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Mnemonic([REDACTED])")
    }
}

/// Onboarding input for a new worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewWorker {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub skills: Vec<String>,
    pub home_geo_location: Option<String>,
    pub work_geo_location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub platform: Option<String>,
    pub service_type: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_type: Option<String>,
}

/// Rejected onboarding input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewWorkerError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl NewWorker {
    /// Check the fields every worker must have.
    pub fn validate(&self) -> Result<(), NewWorkerError> {
        for (name, value) in [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phoneNumber", &self.phone_number),
        ] {
            if value.trim().is_empty() {
                return Err(NewWorkerError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// A gig worker known to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    /// Internal store key.
    pub id: Uuid,
    pub worker_id: WorkerId,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub skills: Vec<String>,
    pub home_geo_location: Option<String>,
    pub work_geo_location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub platform: Option<String>,
    pub service_type: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub profile_id: Option<String>,
    /// DID address credentials are bound to. `None` until a profile exists.
    pub address: Option<String>,
    pub public_key: Option<String>,
    #[serde(skip)]
    pub mnemonic: Option<Mnemonic>,
    pub verification_level: VerificationLevel,
    pub background_check_status: BackgroundCheckStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkerRecord {
    /// Build the record for a freshly onboarded worker bound to `profile`.
    pub fn onboard(input: NewWorker, profile: &DidProfile) -> Self {
        let mut record = Self::without_profile(input);
        record.profile_id = Some(profile.profile_id.clone());
        record.address = Some(profile.address.clone());
        record.public_key = Some(profile.public_key.clone()).filter(|k| !k.is_empty());
        record.mnemonic = Some(Mnemonic::new(profile.mnemonic.as_str()));
        record
    }

    /// Build a record with no DID yet. Such a worker cannot receive credentials.
    pub fn without_profile(input: NewWorker) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            worker_id: WorkerId::generate(),
            full_name: input.full_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone_number: input.phone_number.trim().to_string(),
            skills: input
                .skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            home_geo_location: input.home_geo_location,
            work_geo_location: input.work_geo_location,
            city: input.city,
            state: input.state,
            country: input
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            platform: input.platform,
            service_type: input.service_type,
            license_number: input.license_number,
            vehicle_type: input.vehicle_type,
            profile_id: None,
            address: None,
            public_key: None,
            mnemonic: None,
            verification_level: VerificationLevel::Basic,
            background_check_status: BackgroundCheckStatus::Pending,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// The DID address, if present and non-blank.
    pub fn holder_address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.trim().is_empty())
    }
}

/// A credential issued to a worker and recorded locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: Uuid,
    /// Issuer-assigned identifier. Unique across the store.
    pub credential_id: String,
    /// Document kind label the credential was issued for.
    pub document_kind: String,
    /// The issuer's VC document, serialized as JSON text.
    pub vc: String,
    /// Internal id of the owning worker.
    pub worker_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Onboarding dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub total: u64,
    /// Background check approved.
    pub verified: u64,
    /// Background check pending.
    pub pending: u64,
    pub active: u64,
}

impl WorkerStats {
    /// Tally counters over a set of workers.
    pub fn tally<'a>(workers: impl IntoIterator<Item = &'a WorkerRecord>) -> Self {
        workers.into_iter().fold(Self::default(), |mut stats, w| {
            stats.total += 1;
            match w.background_check_status {
                BackgroundCheckStatus::Approved => stats.verified += 1,
                BackgroundCheckStatus::Pending => stats.pending += 1,
                BackgroundCheckStatus::Rejected | BackgroundCheckStatus::Expired => {}
            }
            if w.is_active {
                stats.active += 1;
            }
            stats
        })
    }
}
