//! # Identity Newtypes
//!
//! String identifiers that flow between the onboarding service, the issuer,
//! and the store. Each is a distinct type and validated at construction.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static LAST_WORKER_MILLIS: AtomicI64 = AtomicI64::new(0);

/// External worker identifier shown to operators (`GW<epoch-millis>`).
///
/// This is not the store's primary key; records are keyed internally by
/// UUID and looked up by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    /// Wrap an existing identifier, rejecting empty input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyWorkerId);
        }
        Ok(Self(id))
    }

    /// Mint a fresh identifier from the current wall-clock time.
    ///
    /// Two calls within the same millisecond get consecutive values, so ids
    /// stay unique within a process.
    pub fn generate() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = LAST_WORKER_MILLIS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        Self(format!("GW{}", now.max(previous + 1)))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// DID address a credential is bound to, as returned by the issuer's profile
/// creation endpoint.
///
/// The format is owned by the issuer; only non-emptiness is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderAddress(String);

impl HolderAddress {
    /// Validate and wrap a holder address.
    pub fn new(address: impl Into<String>) -> Result<Self, ValidationError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(ValidationError::EmptyHolderAddress);
        }
        Ok(Self(address))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HolderAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
