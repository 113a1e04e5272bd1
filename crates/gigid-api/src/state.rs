//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Store**: workers and credentials, write-through to Postgres when configured
//! - **Issuer client**: DID profile creation and credential lookup
//! - **Coordinator**: batch issuance bound to the issuer and the store
//!
//! The issuer is optional. Without it the service still lists workers and
//! stats, and issuer-dependent routes answer 503.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gigid_core::SchemaDescriptor;
use gigid_issuance::BatchCoordinator;
use gigid_issuer_client::IssuerClient;
use url::Url;

use crate::store::PersistentStore;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Service configuration, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Externally visible base URL, used to build credential verification links.
    pub public_base_url: String,
    /// Postgres connection string. `None` means in-memory only.
    pub database_url: Option<String>,
    /// Upper bound on concurrent issuer calls within one batch.
    pub max_concurrency: usize,
    /// Optional JSON file overriding the built-in credential schema.
    pub schema_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("public_base_url", &self.public_base_url)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("max_concurrency", &self.max_concurrency)
            .field("schema_path", &self.schema_path)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            database_url: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            schema_path: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("failed to read credential schema {path}: {source}")]
    SchemaRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("credential schema {path} is not valid JSON: {source}")]
    SchemaParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `PUBLIC_BASE_URL` (default: `http://localhost:8080`)
    /// - `DATABASE_URL` (optional)
    /// - `ISSUANCE_MAX_CONCURRENCY` (default: 8)
    /// - `CREDENTIAL_SCHEMA_PATH` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let present = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let port = match present("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let public_base_url = match present("PUBLIC_BASE_URL") {
            Some(raw) => match Url::parse(raw.trim()) {
                Ok(url) if !url.cannot_be_a_base() => raw.trim().to_string(),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "PUBLIC_BASE_URL",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_PUBLIC_BASE_URL.to_string(),
        };

        let max_concurrency = match present("ISSUANCE_MAX_CONCURRENCY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "ISSUANCE_MAX_CONCURRENCY",
                    value: raw,
                })?,
            None => DEFAULT_MAX_CONCURRENCY,
        };

        Ok(Self {
            port,
            public_base_url,
            database_url: present("DATABASE_URL"),
            max_concurrency,
            schema_path: present("CREDENTIAL_SCHEMA_PATH").map(PathBuf::from),
        })
    }

    /// Public link at which a credential can be verified.
    pub fn verification_url(&self, credential_id: &str) -> String {
        let fallback = || {
            format!(
                "{}/verify/credential/{credential_id}",
                self.public_base_url.trim_end_matches('/')
            )
        };
        let Ok(mut url) = Url::parse(&self.public_base_url) else {
            return fallback();
        };
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments
                    .pop_if_empty()
                    .extend(["verify", "credential", credential_id]);
            }
            Err(()) => return fallback(),
        }
        url.to_string()
    }
}

/// Load the credential schema: the override file if configured, else the
/// built-in government-ID schema.
pub fn load_schema(path: Option<&Path>) -> Result<SchemaDescriptor, ConfigError> {
    let Some(path) = path else {
        return Ok(SchemaDescriptor::government_id());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::SchemaRead {
        path: path.to_path_buf(),
        source,
    })?;
    SchemaDescriptor::from_json(&text).map_err(|source| ConfigError::SchemaParse {
        path: path.to_path_buf(),
        source,
    })
}

/// The batch coordinator as wired in the service.
pub type Coordinator = BatchCoordinator<IssuerClient, PersistentStore>;

/// Shared application state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<PersistentStore>,
    pub issuer: Option<Arc<IssuerClient>>,
    pub coordinator: Option<Coordinator>,
}

impl AppState {
    /// In-memory state with default configuration and no issuer.
    pub fn new() -> Self {
        Self::build(
            AppConfig::default(),
            PersistentStore::in_memory(),
            None,
            SchemaDescriptor::government_id(),
        )
    }

    /// Wire the state from its parts.
    pub fn build(
        config: AppConfig,
        store: PersistentStore,
        issuer: Option<IssuerClient>,
        schema: SchemaDescriptor,
    ) -> Self {
        let store = Arc::new(store);
        let issuer = issuer.map(Arc::new);
        let coordinator = issuer.as_ref().map(|client| {
            BatchCoordinator::new(Arc::clone(client), Arc::clone(&store), schema)
                .with_max_concurrency(config.max_concurrency)
        });
        Self {
            config: Arc::new(config),
            store,
            issuer,
            coordinator,
        }
    }

    /// Load persisted workers and credentials into memory.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        self.store
            .hydrate()
            .await
            .map(|_| ())
            .map_err(|e| format!("failed to hydrate store: {e}"))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
