//! # gigid-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 8080).

use gigid_api::state::{load_schema, AppConfig, AppState};
use gigid_api::store::PersistentStore;
use gigid_issuer_client::{IssuerClient, IssuerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;
    let schema = load_schema(config.schema_path.as_deref())?;

    // Database is optional; absent means in-memory only.
    let db_pool = gigid_api::db::init_pool(config.database_url.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Database initialization failed: {e}");
            e
        })?;

    let issuer = match IssuerConfig::from_env() {
        Ok(issuer_config) => {
            tracing::info!(base_url = %issuer_config.base_url, "Issuer client configured");
            match IssuerClient::new(issuer_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Failed to create issuer client: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                "Issuer client not configured: {e}. Onboarding, issuance and verification endpoints will return 503."
            );
            None
        }
    };

    let port = config.port;
    let state = AppState::build(config, PersistentStore::with_pool(db_pool), issuer, schema);

    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;

    let app = gigid_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("gigid API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
