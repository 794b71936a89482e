//! Autospec Booking Server
//!
//! Accepts booking requests over HTTP and stores them in Firestore.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autospec_booking::{
    api,
    config::{AppConfig, StoreBackend},
    store::{DocumentStore, FirestoreStore, MemoryStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("autospec_booking={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Autospec Booking v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn DocumentStore> = match config.store.backend {
        StoreBackend::Firestore => {
            tracing::info!(
                "Using Firestore project {} (database {})",
                config.firestore.project_id,
                config.firestore.database
            );
            Arc::new(FirestoreStore::new(&config.firestore)?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, bookings are not persisted");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState::new(config, store);
    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
