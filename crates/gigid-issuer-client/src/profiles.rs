//! DID profile creation.
//!
//! `POST {base_url}/profile/create` mints a fresh DID on the issuer's ledger
//! and returns its address together with the recovery mnemonic. The mnemonic
//! is a secret: it is wiped on drop and never rendered by `Debug`.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::IssuerConfig;
use crate::error::{error_message, IssuanceError};

const CREATE_ENDPOINT: &str = "POST /profile/create";

/// A DID profile as returned by the issuer.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidProfile {
    pub profile_id: String,
    /// DID address credentials are bound to.
    pub address: String,
    #[serde(with = "zeroizing_string")]
    pub mnemonic: Zeroizing<String>,
    #[serde(default)]
    pub public_key: String,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

impl std::fmt::Debug for DidProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DidProfile")
            .field("profile_id", &self.profile_id)
            .field("address", &self.address)
            .field("mnemonic", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .field("created_at", &self.created_at)
            .finish()
    }
}

mod zeroizing_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use zeroize::Zeroizing;

    pub fn serialize<S: Serializer>(value: &Zeroizing<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Zeroizing<String>, D::Error> {
        String::deserialize(d).map(Zeroizing::new)
    }
}

/// Client for the issuer profile endpoint.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    http: reqwest::Client,
    config: IssuerConfig,
}

impl ProfileClient {
    pub(crate) fn new(http: reqwest::Client, config: IssuerConfig) -> Self {
        Self { http, config }
    }

    /// Create a new DID profile.
    pub async fn create(&self) -> Result<DidProfile, IssuanceError> {
        let url = self.config.endpoint(&["profile", "create"])?;

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| {
                IssuanceError::from_transport(CREATE_ENDPOINT, self.config.timeout_secs, e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IssuanceError::Status {
                endpoint: CREATE_ENDPOINT.into(),
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        let profile: DidProfile = resp.json().await.map_err(|e| IssuanceError::Deserialization {
            endpoint: CREATE_ENDPOINT.into(),
            reason: e.to_string(),
        })?;

        if profile.address.trim().is_empty() {
            return Err(IssuanceError::Rejected {
                endpoint: CREATE_ENDPOINT.into(),
                message: "issuer returned a profile without an address".into(),
            });
        }

        tracing::info!(profile_id = %profile.profile_id, address = %profile.address, "DID profile created");
        Ok(profile)
    }
}
