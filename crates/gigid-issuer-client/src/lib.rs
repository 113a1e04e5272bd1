//! # gigid-issuer-client -- Typed Rust client for the DID/VC issuer
//!
//! The issuer is the trust anchor of the platform: it mints DID profiles and
//! signs verifiable credentials. This crate wraps its HTTP API:
//!
//! - **Credentials**: `POST /cred` (issue), `GET /cred/{id}` (lookup)
//! - **Profiles**: `POST /profile/create` (mint a DID)
//!
//! Every request carries `Authorization: Bearer <token>` and is bounded by the
//! configured timeout. Calls are made exactly once; there is no retry layer,
//! since a repeated `POST /cred` would mint a second credential.

pub mod config;
pub mod credentials;
pub mod error;
pub mod profiles;

pub use config::{ConfigError, IssuerConfig};
pub use credentials::{CredentialIssuanceResult, VerifiableCredential};
pub use error::IssuanceError;
pub use profiles::DidProfile;

use std::time::Duration;

/// Top-level issuer client. Holds one sub-client per endpoint group, all
/// sharing a single connection pool.
#[derive(Debug, Clone)]
pub struct IssuerClient {
    credentials: credentials::CredentialClient,
    profiles: profiles::ProfileClient,
}

impl IssuerClient {
    /// Create a new issuer client from configuration.
    pub fn new(config: IssuerConfig) -> Result<Self, IssuanceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut auth = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.api_token.as_str()
                ))
                .map_err(|_| IssuanceError::Config(ConfigError::InvalidToken))?;
                auth.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, auth);
                headers
            })
            .build()
            .map_err(|e| IssuanceError::Transport {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            credentials: credentials::CredentialClient::new(http.clone(), config.clone()),
            profiles: profiles::ProfileClient::new(http, config),
        })
    }

    /// Access the credential (issue/lookup) client.
    pub fn credentials(&self) -> &credentials::CredentialClient {
        &self.credentials
    }

    /// Access the DID profile client.
    pub fn profiles(&self) -> &profiles::ProfileClient {
        &self.profiles
    }
}
