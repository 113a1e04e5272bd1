//! Issuer client configuration.
//!
//! Built once at process start and handed to [`crate::IssuerClient::new`].
//! Nothing in this crate reads the environment after construction.

use url::Url;
use zeroize::Zeroizing;

/// Default per-request timeout. Issuance is an interactive dashboard
/// operation, so a stalled issuer should fail the item quickly.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for connecting to the issuer service.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct IssuerConfig {
    /// Base URL of the issuer API, e.g. `https://issuer.example/api/v1`.
    pub base_url: Url,
    /// Bearer token for API authentication. Wiped from memory on drop.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl IssuerConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: Url, api_token: impl Into<String>) -> Self {
        Self {
            base_url,
            api_token: Zeroizing::new(api_token.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ISSUER_API_BASE_URL` (required)
    /// - `ISSUER_BEARER_TOKEN` (required)
    /// - `ISSUER_TIMEOUT_SECS` (default: 15)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("ISSUER_API_BASE_URL").ok_or(ConfigError::MissingBaseUrl)?;
        let base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("ISSUER_API_BASE_URL".to_string(), e.to_string()))?;
        let api_token = lookup("ISSUER_BEARER_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            base_url,
            api_token: Zeroizing::new(api_token),
            timeout_secs: lookup("ISSUER_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ConfigError::InvalidUrl(
                    "ISSUER_API_BASE_URL".to_string(),
                    "URL cannot be a base".to_string(),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ISSUER_API_BASE_URL environment variable is required")]
    MissingBaseUrl,
    #[error("ISSUER_BEARER_TOKEN environment variable is required")]
    MissingToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("bearer token contains characters not allowed in an HTTP header")]
    InvalidToken,
}
